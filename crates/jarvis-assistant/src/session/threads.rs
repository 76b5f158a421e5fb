//! Thread registry operations and vector store linking.

use tracing::info;

use crate::error::AssistantError;
use crate::gateway::{AssistantUpdate, ThreadObject, ToolResources};
use crate::vector_store::VectorStore;

use super::manager::AssistantSession;
use super::types::LinkScope;

impl AssistantSession {
    /// Create a remote thread registered under `alias`.
    pub async fn create_thread(&mut self, alias: &str) -> Result<String, AssistantError> {
        self.threads.ensure_free(alias)?;

        let thread = self
            .gateway
            .create_thread()
            .await
            .map_err(|e| AssistantError::resource("create thread", e))?;
        self.threads.insert(alias, thread.id.clone())?;

        info!(alias, thread_id = %thread.id, "thread created");
        Ok(thread.id)
    }

    /// Delete the thread under `alias`. The alias is only released once the
    /// service confirms the deletion.
    pub async fn delete_thread(&mut self, alias: &str) -> Result<(), AssistantError> {
        let thread_id = self.threads.resolve(alias)?.to_string();

        let deletion = self
            .gateway
            .delete_thread(&thread_id)
            .await
            .map_err(|e| AssistantError::resource("delete thread", e))?;
        if !deletion.deleted {
            return Err(AssistantError::DeletionRefused {
                resource: "thread",
                id: thread_id,
            });
        }

        self.threads.remove(alias);
        info!(alias, thread_id = %thread_id, "thread deleted");
        Ok(())
    }

    /// Move a thread to a new alias. Local only.
    pub fn rename_thread(&mut self, old: &str, new: &str) -> Result<(), AssistantError> {
        self.threads.rename(old, new)?;
        self.tracker.rename_thread(old, new);
        Ok(())
    }

    /// Fetch the remote thread under `alias`.
    pub async fn retrieve_thread(&self, alias: &str) -> Result<ThreadObject, AssistantError> {
        let thread_id = self.threads.resolve(alias)?;
        self.gateway
            .retrieve_thread(thread_id)
            .await
            .map_err(|e| AssistantError::resource("retrieve thread", e))
    }

    pub fn thread_id(&self, alias: &str) -> Option<&str> {
        self.threads.get(alias)
    }

    /// Registered thread aliases, sorted.
    pub fn thread_aliases(&self) -> Vec<String> {
        self.threads.aliases()
    }

    /// Make `store` the file search source of `scope`.
    ///
    /// Replaces any store previously linked to that scope.
    pub async fn link_vector_store(
        &self,
        store: &VectorStore,
        scope: LinkScope<'_>,
    ) -> Result<(), AssistantError> {
        let store_id = store.id().ok_or_else(|| {
            AssistantError::Link(format!("vector store '{}' has no remote id", store.name()))
        })?;
        let resources = ToolResources::single_vector_store(store_id);

        match scope {
            LinkScope::Assistant => {
                let update = AssistantUpdate {
                    tool_resources: Some(resources),
                    ..Default::default()
                };
                self.push_update("link vector store to assistant", &update)
                    .await?;
                info!(vector_store_id = store_id, "vector store linked to assistant");
            }
            LinkScope::Thread(alias) => {
                let thread_id = self.threads.resolve(alias)?;
                self.gateway
                    .update_thread(thread_id, &resources)
                    .await
                    .map_err(|e| AssistantError::resource("link vector store to thread", e))?;
                info!(
                    vector_store_id = store_id,
                    alias,
                    thread_id,
                    "vector store linked to thread"
                );
            }
        }
        Ok(())
    }
}
