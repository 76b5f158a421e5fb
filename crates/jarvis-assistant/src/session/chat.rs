//! Async message and run methods for AssistantSession (polled + streaming).

use tracing::{debug, info};

use crate::error::AssistantError;
use crate::gateway::{ListOrder, Role, RunStatus};
use crate::stream::{ConsoleHandler, ResponseStream, StreamHandler, StreamSummary};

use super::manager::AssistantSession;

impl AssistantSession {
    /// Append a user message to the thread under `alias`. Returns the
    /// message id.
    pub async fn post_message(&self, alias: &str, text: &str) -> Result<String, AssistantError> {
        let thread_id = self.threads.resolve(alias)?;
        let message = self
            .gateway
            .create_message(thread_id, Role::User, text)
            .await
            .map_err(|e| AssistantError::resource("create message", e))?;
        debug!(alias, message_id = %message.id, chars = text.len(), "message posted");
        Ok(message.id)
    }

    /// Run the assistant on the thread and wait for it to finish.
    ///
    /// Returns the texts of the assistant messages that follow the latest
    /// non-assistant message, oldest first.
    pub async fn run_to_completion(&mut self, alias: &str) -> Result<Vec<String>, AssistantError> {
        let thread_id = self.threads.resolve(alias)?.to_string();
        let assistant_id = self.require_id()?.to_string();

        let mut run = self
            .gateway
            .create_run(&thread_id, &assistant_id)
            .await
            .map_err(|e| AssistantError::resource("create run", e))?;
        debug!(run_id = %run.id, status = %run.status, "run created");

        while !run.status.is_terminal() {
            tokio::time::sleep(self.poll_interval).await;
            run = self
                .gateway
                .retrieve_run(&thread_id, &run.id)
                .await
                .map_err(|e| AssistantError::resource("retrieve run", e))?;
            debug!(run_id = %run.id, status = %run.status, "run polled");
        }

        if run.status != RunStatus::Completed {
            return Err(AssistantError::Run { status: run.status });
        }
        if let Some(usage) = &run.usage {
            self.tracker.record(alias, usage);
        }

        let messages = self
            .gateway
            .list_messages(&thread_id, ListOrder::Desc)
            .await
            .map_err(|e| AssistantError::resource("list messages", e))?;

        let mut texts: Vec<String> = messages
            .iter()
            .take_while(|m| m.role == Role::Assistant)
            .filter_map(|m| m.text().map(|t| t.value.clone()))
            .collect();
        texts.reverse();

        info!(alias, run_id = %run.id, messages = texts.len(), "run completed");
        Ok(texts)
    }

    /// Stream a run on the thread through `handler`.
    pub async fn stream_response(
        &mut self,
        alias: &str,
        handler: &mut dyn StreamHandler,
    ) -> Result<StreamSummary, AssistantError> {
        let thread_id = self.threads.resolve(alias)?.to_string();
        let assistant_id = self.require_id()?.to_string();

        let summary = ResponseStream::new(&*self.gateway, handler, thread_id)
            .with_max_tool_rounds(self.max_tool_rounds)
            .start(&assistant_id)
            .await?;

        if let Some(usage) = &summary.usage {
            self.tracker.record(alias, usage);
        }
        Ok(summary)
    }

    /// Stream a run to stdout, prefixed with the assistant's name.
    pub async fn stream_to_console(&mut self, alias: &str) -> Result<StreamSummary, AssistantError> {
        let mut handler = ConsoleHandler::new(self.config.name.clone());
        self.stream_response(alias, &mut handler).await
    }
}
