//! Remote document index with named files.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::gateway::{AssistantGateway, ExpiresAfter, FileUpload, IngestionStatus};
use crate::registry::AliasRegistry;

/// Creation settings for a vector store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorStoreSettings {
    pub name: String,
    /// Days of inactivity before the remote store expires.
    pub lifetime_days: u32,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            name: "Vector Store".to_string(),
            lifetime_days: 1,
        }
    }
}

/// One remote vector store and the files added through it.
pub struct VectorStore {
    gateway: Arc<dyn AssistantGateway>,
    /// Remote store id. `None` once deleted.
    id: Option<String>,
    name: String,
    lifetime_days: u32,
    /// File alias to remote file id.
    files: AliasRegistry,
    ingestion_poll_interval: Duration,
}

impl VectorStore {
    /// Attach to the store `id`, or create one from `settings` when `None`.
    pub async fn connect(
        gateway: Arc<dyn AssistantGateway>,
        id: Option<&str>,
        settings: VectorStoreSettings,
    ) -> Result<Self, AssistantError> {
        let remote = match id {
            Some(id) => gateway
                .retrieve_vector_store(id)
                .await
                .map_err(|e| AssistantError::resource("retrieve vector store", e))?,
            None => gateway
                .create_vector_store(
                    &settings.name,
                    &ExpiresAfter::last_active(settings.lifetime_days),
                )
                .await
                .map_err(|e| AssistantError::resource("create vector store", e))?,
        };

        let lifetime_days = remote
            .expires_after
            .as_ref()
            .map(|e| e.days)
            .unwrap_or(settings.lifetime_days);
        let name = remote.name.clone().unwrap_or(settings.name);
        info!(vector_store_id = %remote.id, name = %name, lifetime_days, "vector store ready");

        Ok(Self {
            gateway,
            id: Some(remote.id),
            name,
            lifetime_days,
            files: AliasRegistry::new("file"),
            ingestion_poll_interval: Duration::from_secs(1),
        })
    }

    pub fn with_ingestion_poll_interval(mut self, interval: Duration) -> Self {
        self.ingestion_poll_interval = interval;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifetime_days(&self) -> u32 {
        self.lifetime_days
    }

    pub fn file_id(&self, alias: &str) -> Option<&str> {
        self.files.get(alias)
    }

    /// Registered file aliases, sorted.
    pub fn file_aliases(&self) -> Vec<String> {
        self.files.aliases()
    }

    fn require_id(&self) -> Result<&str, AssistantError> {
        self.id.as_deref().ok_or(AssistantError::Unbound {
            resource: "vector store",
        })
    }

    /// Upload the file at `path` and wait until the store has ingested it.
    ///
    /// The alias is registered only after ingestion completes. A failed
    /// ingestion deletes the upload.
    pub async fn add_file_by_path(
        &mut self,
        alias: &str,
        path: impl AsRef<Path>,
    ) -> Result<String, AssistantError> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(AssistantError::FileNotFound(path.to_path_buf()));
        }
        self.files.ensure_free(alias)?;
        let store_id = self.require_id()?.to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AssistantError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| alias.to_string());
        debug!(alias, filename = %filename, size = bytes.len(), "uploading file");

        let file = self
            .gateway
            .upload_file(FileUpload { filename, bytes })
            .await
            .map_err(|e| AssistantError::resource("upload file", e))?;

        if let Err(e) = self.wait_for_ingestion(&store_id, &file.id).await {
            self.discard_upload(&file.id).await;
            return Err(e);
        }

        self.files.insert(alias, file.id.clone())?;
        info!(alias, file_id = %file.id, vector_store_id = %store_id, "file added");
        Ok(file.id)
    }

    async fn wait_for_ingestion(&self, store_id: &str, file_id: &str) -> Result<(), AssistantError> {
        let mut attachment = self
            .gateway
            .create_vector_store_file(store_id, file_id)
            .await
            .map_err(|e| AssistantError::resource("attach file to vector store", e))?;

        while attachment.status == IngestionStatus::InProgress {
            tokio::time::sleep(self.ingestion_poll_interval).await;
            attachment = self
                .gateway
                .retrieve_vector_store_file(store_id, file_id)
                .await
                .map_err(|e| AssistantError::resource("poll file ingestion", e))?;
            debug!(file_id, status = %attachment.status, "ingestion polled");
        }

        match attachment.status {
            IngestionStatus::Completed => Ok(()),
            status => {
                if let Some(error) = &attachment.last_error {
                    warn!(file_id, code = %error.code, message = %error.message, "ingestion failed");
                }
                Err(AssistantError::Ingestion {
                    file_id: file_id.to_string(),
                    status,
                })
            }
        }
    }

    /// Best-effort removal of an upload that never got an alias.
    async fn discard_upload(&self, file_id: &str) {
        match self.gateway.delete_file(file_id).await {
            Ok(deletion) if deletion.deleted => debug!(file_id, "discarded upload"),
            Ok(_) => warn!(file_id, "service refused to delete discarded upload"),
            Err(e) => warn!(file_id, error = %e, "failed to delete discarded upload"),
        }
    }

    /// Delete the file under `alias`. Succeeds without a remote call when
    /// no files are registered.
    pub async fn delete_file(&mut self, alias: &str) -> Result<(), AssistantError> {
        if self.files.is_empty() {
            return Ok(());
        }
        let file_id = self.files.resolve(alias)?.to_string();

        let deletion = self
            .gateway
            .delete_file(&file_id)
            .await
            .map_err(|e| AssistantError::resource("delete file", e))?;
        if !deletion.deleted {
            return Err(AssistantError::DeletionRefused {
                resource: "file",
                id: file_id,
            });
        }

        self.files.remove(alias);
        info!(alias, file_id = %file_id, "file deleted");
        Ok(())
    }

    /// Delete every registered file, continuing past failures.
    ///
    /// Fails with `PartialDeletion` naming the aliases that remain.
    pub async fn delete_all_files(&mut self) -> Result<(), AssistantError> {
        for alias in self.files.aliases() {
            if let Err(e) = self.delete_file(&alias).await {
                warn!(alias = %alias, error = %e, "file deletion failed");
            }
        }

        if self.files.is_empty() {
            Ok(())
        } else {
            Err(AssistantError::PartialDeletion {
                remaining: self.files.aliases(),
            })
        }
    }

    /// Delete the remote store, optionally deleting its files first.
    ///
    /// File deletion failures are logged and do not stop the store deletion.
    pub async fn delete_store(&mut self, delete_files: bool) -> Result<(), AssistantError> {
        if delete_files {
            if let Err(e) = self.delete_all_files().await {
                warn!(error = %e, "continuing store deletion with files left behind");
            }
        }

        let Some(id) = self.id.clone() else {
            return Ok(());
        };
        let deletion = self
            .gateway
            .delete_vector_store(&id)
            .await
            .map_err(|e| AssistantError::resource("delete vector store", e))?;
        if !deletion.deleted {
            return Err(AssistantError::DeletionRefused {
                resource: "vector store",
                id,
            });
        }

        self.id = None;
        info!(vector_store_id = %id, "vector store deleted");
        Ok(())
    }
}
