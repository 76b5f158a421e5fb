//! Event loop of one streamed run.

use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::gateway::{
    AssistantGateway, MessageObject, RunEvent, RunEventStream, RunObject, RunUsage, ToolOutput,
};

use super::handler::{Citation, StreamHandler};

/// Tool-output resubmissions allowed per run.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Receiving,
    /// Paused on `requires_action` while local tools run.
    AwaitingLocalAction,
    Completed,
    Faulted,
}

/// What a finished stream produced.
#[derive(Debug, Clone, Default)]
pub struct StreamSummary {
    pub run_id: Option<String>,
    /// Completed message texts, markers rewritten, in arrival order.
    pub messages: Vec<String>,
    pub citations: Vec<Citation>,
    pub tool_rounds: usize,
    pub usage: Option<RunUsage>,
}

impl StreamSummary {
    /// All message texts joined by newlines.
    pub fn text(&self) -> String {
        self.messages.join("\n")
    }
}

enum Flow {
    Continue,
    Stop,
    Resume(RunEventStream),
}

/// Drives one run's events through a handler.
///
/// Single use: a second `start` or `consume` fails with `Stream`.
pub struct ResponseStream<'a> {
    gateway: &'a dyn AssistantGateway,
    handler: &'a mut dyn StreamHandler,
    thread_id: String,
    state: StreamState,
    max_tool_rounds: usize,
    summary: StreamSummary,
}

impl<'a> ResponseStream<'a> {
    pub fn new(
        gateway: &'a dyn AssistantGateway,
        handler: &'a mut dyn StreamHandler,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            handler,
            thread_id: thread_id.into(),
            state: StreamState::Idle,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            summary: StreamSummary::default(),
        }
    }

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Start a run of `assistant_id` on the thread and consume it.
    pub async fn start(&mut self, assistant_id: &str) -> Result<StreamSummary, AssistantError> {
        self.ensure_unused()?;
        let opened = self.gateway.stream_run(&self.thread_id, assistant_id).await;
        let events = match opened {
            Ok(events) => events,
            Err(e) => return Err(self.fault(format!("failed to start run: {e}"))),
        };
        self.consume(events).await
    }

    /// Consume an already opened event stream until the run ends.
    ///
    /// A stream that closes before `thread.run.completed` is a fault.
    pub async fn consume(
        &mut self,
        mut events: RunEventStream,
    ) -> Result<StreamSummary, AssistantError> {
        self.ensure_unused()?;
        self.state = StreamState::Receiving;

        while let Some(next) = events.next().await {
            let event = match next {
                Ok(event) => event,
                Err(e) => return Err(self.fault(format!("transport error: {e}"))),
            };
            match self.handle(event).await? {
                Flow::Continue => {}
                Flow::Stop => break,
                Flow::Resume(resumed) => {
                    events = resumed;
                    self.state = StreamState::Receiving;
                }
            }
        }

        if self.state != StreamState::Completed {
            return Err(self.fault("event stream ended before the run completed".to_string()));
        }
        info!(
            run_id = self.summary.run_id.as_deref().unwrap_or(""),
            messages = self.summary.messages.len(),
            tool_rounds = self.summary.tool_rounds,
            "run stream finished"
        );
        Ok(std::mem::take(&mut self.summary))
    }

    fn ensure_unused(&self) -> Result<(), AssistantError> {
        if self.state == StreamState::Idle {
            Ok(())
        } else {
            Err(AssistantError::Stream(
                "response stream was already consumed".to_string(),
            ))
        }
    }

    async fn handle(&mut self, event: RunEvent) -> Result<Flow, AssistantError> {
        match event {
            RunEvent::RunCreated(run) => {
                debug!(run_id = %run.id, "run created");
                self.summary.run_id = Some(run.id);
            }
            RunEvent::RunUpdated(run) => {
                debug!(run_id = %run.id, status = %run.status, "run status");
            }
            RunEvent::MessageCreated(_) => self.handler.on_text_created(),
            RunEvent::TextDelta(delta) => self.handler.on_text_delta(&delta),
            RunEvent::ToolCallCreated { kind } => self.handler.on_tool_call_created(&kind),
            RunEvent::MessageCompleted(message) => {
                let (text, citations) = self.resolve_citations(&message).await;
                self.handler.on_message_done(&text, &citations);
                self.summary.messages.push(text);
                self.summary.citations.extend(citations);
            }
            RunEvent::RequiresAction(run) => {
                return self.resubmit(run).await.map(Flow::Resume);
            }
            RunEvent::RunCompleted(run) => {
                self.summary.run_id = Some(run.id);
                self.summary.usage = run.usage;
                self.state = StreamState::Completed;
            }
            RunEvent::RunEnded(run) => {
                let detail = run
                    .last_error
                    .as_ref()
                    .map(|e| format!(": {}", e.message))
                    .unwrap_or_default();
                return Err(self.fault(format!("run ended with status {}{detail}", run.status)));
            }
            RunEvent::Error(message) => return Err(self.fault(message)),
            RunEvent::Done => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    /// Execute every required tool call and resume the same run.
    async fn resubmit(&mut self, run: RunObject) -> Result<RunEventStream, AssistantError> {
        self.state = StreamState::AwaitingLocalAction;
        self.summary.run_id = Some(run.id.clone());

        if self.summary.tool_rounds >= self.max_tool_rounds {
            return Err(self.fault(format!(
                "run {} exceeded {} tool rounds",
                run.id, self.max_tool_rounds
            )));
        }
        self.summary.tool_rounds += 1;

        let mut outputs = Vec::new();
        for call in run.required_tool_calls() {
            let arguments: Value = match serde_json::from_str(&call.function.arguments) {
                Ok(arguments) => arguments,
                Err(e) => {
                    return Err(self.fault(format!(
                        "invalid arguments for function '{}': {e}",
                        call.function.name
                    )))
                }
            };
            debug!(tool = %call.function.name, call_id = %call.id, "executing tool call");
            match self.handler.on_tool_call(&call.function.name, &arguments) {
                Ok(output) => outputs.push(ToolOutput {
                    tool_call_id: call.id.clone(),
                    output,
                }),
                Err(e) => {
                    return Err(self.fault(format!(
                        "function '{}' failed: {e}",
                        call.function.name
                    )))
                }
            }
        }

        info!(
            run_id = %run.id,
            outputs = outputs.len(),
            round = self.summary.tool_rounds,
            "submitting tool outputs"
        );
        let resumed = self
            .gateway
            .submit_tool_outputs_stream(&self.thread_id, &run.id, &outputs)
            .await;
        match resumed {
            Ok(events) => Ok(events),
            Err(e) => Err(self.fault(format!("failed to submit tool outputs: {e}"))),
        }
    }

    /// Replace annotation markers with `[index]` and resolve cited files.
    async fn resolve_citations(&self, message: &MessageObject) -> (String, Vec<Citation>) {
        let Some(content) = message.text() else {
            return (String::new(), Vec::new());
        };

        let mut text = content.value.clone();
        let mut citations = Vec::new();
        for (index, annotation) in content.annotations.iter().enumerate() {
            if !annotation.text.is_empty() {
                text = text.replace(&annotation.text, &format!("[{index}]"));
            }
            let Some(cited) = &annotation.file_citation else {
                continue;
            };
            let filename = match self.gateway.retrieve_file(&cited.file_id).await {
                Ok(file) => file.filename,
                Err(e) => {
                    warn!(file_id = %cited.file_id, error = %e, "could not resolve cited file");
                    cited.file_id.clone()
                }
            };
            citations.push(Citation {
                index,
                file_id: cited.file_id.clone(),
                filename,
            });
        }
        (text, citations)
    }

    fn fault(&mut self, message: String) -> AssistantError {
        warn!(thread_id = %self.thread_id, error = %message, "response stream faulted");
        self.state = StreamState::Faulted;
        self.handler.on_exception(&message);
        AssistantError::Stream(message)
    }
}
