//! Session struct and assistant configuration management.

use std::sync::Arc;
use std::time::Duration;

use jarvis_common::LanguageModel;
use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::gateway::{AssistantGateway, AssistantObject, AssistantParams, AssistantUpdate, Tool};
use crate::registry::AliasRegistry;
use crate::stream::DEFAULT_MAX_TOOL_ROUNDS;
use crate::token_tracker::TokenTracker;

use super::types::{with_file_search, AssistantConfig};

/// A remote assistant and its named conversation threads.
pub struct AssistantSession {
    pub(super) gateway: Arc<dyn AssistantGateway>,
    /// Remote assistant id. `None` once deleted.
    pub(super) id: Option<String>,
    pub(super) config: AssistantConfig,
    /// Thread alias to remote thread id.
    pub(super) threads: AliasRegistry,
    /// Delay between run status polls.
    pub(super) poll_interval: Duration,
    /// Maximum tool-output resubmissions per streamed run.
    pub(super) max_tool_rounds: usize,
    pub(super) tracker: TokenTracker,
}

impl AssistantSession {
    /// Attach to the assistant `id`, or create one from `config` when `None`.
    ///
    /// When attaching, the local configuration mirrors the remote one.
    pub async fn connect(
        gateway: Arc<dyn AssistantGateway>,
        id: Option<&str>,
        config: AssistantConfig,
    ) -> Result<Self, AssistantError> {
        let (remote, config) = match id {
            Some(id) => {
                let remote = gateway
                    .retrieve_assistant(id)
                    .await
                    .map_err(|e| AssistantError::resource("retrieve assistant", e))?;
                let config = mirror_remote(&remote, config);
                (remote, config)
            }
            None => {
                let tools = with_file_search(config.tools.clone());
                let params = AssistantParams {
                    name: config.name.clone(),
                    instructions: config.instructions.clone(),
                    model: config.model.as_str().to_string(),
                    tools: tools.clone(),
                };
                let remote = gateway
                    .create_assistant(&params)
                    .await
                    .map_err(|e| AssistantError::resource("create assistant", e))?;
                (remote, AssistantConfig { tools, ..config })
            }
        };

        info!(
            assistant_id = %remote.id,
            name = %config.name,
            model = %config.model,
            "assistant session ready"
        );

        Ok(Self {
            gateway,
            id: Some(remote.id),
            config,
            threads: AliasRegistry::new("thread"),
            poll_interval: Duration::from_secs(1),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            tracker: TokenTracker::new(),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Remote assistant id, `None` after deletion.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Accumulated token usage of completed runs.
    pub fn usage(&self) -> &TokenTracker {
        &self.tracker
    }

    pub fn gateway(&self) -> Arc<dyn AssistantGateway> {
        Arc::clone(&self.gateway)
    }

    pub(super) fn require_id(&self) -> Result<&str, AssistantError> {
        self.id
            .as_deref()
            .ok_or(AssistantError::Unbound {
                resource: "assistant",
            })
    }

    /// Send `update` to the remote assistant. Local state is untouched.
    pub(super) async fn push_update(
        &self,
        action: &str,
        update: &AssistantUpdate,
    ) -> Result<AssistantObject, AssistantError> {
        let id = self.require_id()?;
        debug!(assistant_id = %id, action, "updating assistant");
        self.gateway
            .update_assistant(id, update)
            .await
            .map_err(|e| AssistantError::resource(action, e))
    }

    pub async fn update_name(&mut self, name: &str) -> Result<(), AssistantError> {
        let update = AssistantUpdate {
            name: Some(name.to_string()),
            ..Default::default()
        };
        self.push_update("update assistant name", &update).await?;
        self.config.name = name.to_string();
        Ok(())
    }

    pub async fn update_instructions(&mut self, instructions: &str) -> Result<(), AssistantError> {
        let update = AssistantUpdate {
            instructions: Some(instructions.to_string()),
            ..Default::default()
        };
        self.push_update("update assistant instructions", &update)
            .await?;
        self.config.instructions = instructions.to_string();
        Ok(())
    }

    pub async fn update_model(&mut self, model: LanguageModel) -> Result<(), AssistantError> {
        let update = AssistantUpdate {
            model: Some(model.as_str().to_string()),
            ..Default::default()
        };
        self.push_update("update assistant model", &update).await?;
        self.config.model = model;
        Ok(())
    }

    /// Replace the tool list. File search is always kept, exactly once.
    pub async fn update_tools(&mut self, tools: Vec<Tool>) -> Result<(), AssistantError> {
        let tools = with_file_search(tools);
        let update = AssistantUpdate {
            tools: Some(tools.clone()),
            ..Default::default()
        };
        self.push_update("update assistant tools", &update).await?;
        self.config.tools = tools;
        Ok(())
    }

    /// Delete the remote assistant. A second call is a no-op.
    ///
    /// Remote threads are not deleted; their ids are logged and the local
    /// registry is cleared.
    pub async fn delete_assistant(&mut self) -> Result<(), AssistantError> {
        let Some(id) = self.id.clone() else {
            return Ok(());
        };

        let deletion = self
            .gateway
            .delete_assistant(&id)
            .await
            .map_err(|e| AssistantError::resource("delete assistant", e))?;
        if !deletion.deleted {
            return Err(AssistantError::DeletionRefused {
                resource: "assistant",
                id,
            });
        }

        if !self.threads.is_empty() {
            warn!(
                assistant_id = %id,
                threads = ?self.threads.ids(),
                "abandoning remote threads of deleted assistant"
            );
        }
        self.threads.clear();
        self.id = None;
        info!(assistant_id = %id, "assistant deleted");
        Ok(())
    }
}

/// Local config reflecting a retrieved assistant. Fields the remote leaves
/// unset, and models outside `LanguageModel`, keep the caller's values.
/// File search is kept exactly once whatever the remote lists.
fn mirror_remote(remote: &AssistantObject, fallback: AssistantConfig) -> AssistantConfig {
    let model = match remote.model.parse::<LanguageModel>() {
        Ok(model) => model,
        Err(e) => {
            warn!(model = %remote.model, error = %e, "keeping configured model");
            fallback.model
        }
    };
    AssistantConfig {
        name: remote.name.clone().unwrap_or(fallback.name),
        instructions: remote.instructions.clone().unwrap_or(fallback.instructions),
        model,
        tools: with_file_search(remote.tools.clone()),
    }
}
