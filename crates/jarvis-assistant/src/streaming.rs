//! Server-Sent Events (SSE) streaming parser.
//!
//! Streamed runs arrive as SSE frames named after the run object they
//! carry (`thread.run.completed`, `thread.message.delta`, ...). This module
//! splits a reqwest response into frames and decodes each frame into a
//! `RunEvent`.

use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;
use tracing::{debug, trace};

use crate::gateway::{MessageObject, RunEvent, RunEventStream, RunObject};
use crate::GatewayError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// The event type (e.g. "thread.message.delta").
    pub event: Option<String>,
    /// The event data (usually a JSON object).
    pub data: String,
}

/// Turn a streaming HTTP response into a stream of run events.
pub fn run_event_stream(response: reqwest::Response) -> RunEventStream {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    sse_events(reader)
        .filter_map(|frame| async move {
            match frame {
                Ok(event) => parse_run_event(&event),
                Err(e) => Some(Err(e)),
            }
        })
        .boxed()
}

struct SseState<R> {
    reader: R,
    event: Option<String>,
    data: String,
    finished: bool,
}

/// Split a line-oriented reader into SSE frames.
pub fn sse_events<R>(reader: R) -> impl futures_util::Stream<Item = Result<SseEvent, GatewayError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = SseState {
        reader,
        event: None,
        data: String::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            let mut line = String::new();
            let read = match state.reader.read_line(&mut line).await {
                Ok(read) => read,
                Err(e) => {
                    state.finished = true;
                    return Some((Err(GatewayError::NetworkError(e.to_string())), state));
                }
            };

            if read == 0 {
                // Flush any remaining event
                state.finished = true;
                if state.data.is_empty() {
                    return None;
                }
                let event = SseEvent {
                    event: state.event.take(),
                    data: std::mem::take(&mut state.data),
                };
                return Some((Ok(event), state));
            }

            let line = line.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                // Empty line = end of event
                if state.data.is_empty() {
                    state.event = None;
                    continue;
                }
                let event = SseEvent {
                    event: state.event.take(),
                    data: std::mem::take(&mut state.data),
                };
                return Some((Ok(event), state));
            }

            if let Some(event_type) = line.strip_prefix("event:") {
                state.event = Some(event_type.trim_start().to_string());
            } else if let Some(data) = line.strip_prefix("data:") {
                if !state.data.is_empty() {
                    state.data.push('\n');
                }
                state.data.push_str(data.strip_prefix(' ').unwrap_or(data));
            }
            // Ignore other fields (id:, retry:, comments)
        }
    })
}

/// Decode one SSE frame. Returns `None` for events the session ignores.
pub fn parse_run_event(frame: &SseEvent) -> Option<Result<RunEvent, GatewayError>> {
    let name = frame.event.as_deref().unwrap_or("");
    trace!(event = name, "run stream event");

    match name {
        "done" => return Some(Ok(RunEvent::Done)),
        "error" => return Some(Ok(RunEvent::Error(error_message(&frame.data)))),
        _ => {}
    }

    let result = match name {
        "thread.run.created" => parse_run(&frame.data).map(RunEvent::RunCreated),
        "thread.run.queued" | "thread.run.in_progress" | "thread.run.cancelling" => {
            parse_run(&frame.data).map(RunEvent::RunUpdated)
        }
        "thread.run.requires_action" => parse_run(&frame.data).map(RunEvent::RequiresAction),
        "thread.run.completed" => parse_run(&frame.data).map(RunEvent::RunCompleted),
        "thread.run.failed"
        | "thread.run.cancelled"
        | "thread.run.expired"
        | "thread.run.incomplete" => parse_run(&frame.data).map(RunEvent::RunEnded),
        "thread.message.created" => parse_message(&frame.data).map(RunEvent::MessageCreated),
        "thread.message.completed" => parse_message(&frame.data).map(RunEvent::MessageCompleted),
        "thread.message.delta" => match text_delta(&frame.data) {
            Ok(Some(text)) => Ok(RunEvent::TextDelta(text)),
            Ok(None) => return None,
            Err(e) => Err(e),
        },
        "thread.run.step.created" => match tool_call_kind(&frame.data) {
            Ok(Some(kind)) => Ok(RunEvent::ToolCallCreated { kind }),
            Ok(None) => return None,
            Err(e) => Err(e),
        },
        other => {
            debug!(event = other, "ignoring run stream event");
            return None;
        }
    };

    Some(result)
}

fn parse_run(data: &str) -> Result<RunObject, GatewayError> {
    serde_json::from_str(data).map_err(|e| GatewayError::ParseError(format!("run event: {e}")))
}

fn parse_message(data: &str) -> Result<MessageObject, GatewayError> {
    serde_json::from_str(data)
        .map_err(|e| GatewayError::ParseError(format!("message event: {e}")))
}

fn parse_value(data: &str) -> Result<Value, GatewayError> {
    serde_json::from_str(data).map_err(|e| GatewayError::ParseError(e.to_string()))
}

/// Concatenated text of a `thread.message.delta` payload.
fn text_delta(data: &str) -> Result<Option<String>, GatewayError> {
    let json = parse_value(data)?;
    let text: String = json["delta"]["content"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter(|p| p["type"] == "text")
                .filter_map(|p| p["text"]["value"].as_str())
                .collect()
        })
        .unwrap_or_default();
    Ok((!text.is_empty()).then_some(text))
}

/// Tool type of a `thread.run.step.created` payload, for tool-call steps.
fn tool_call_kind(data: &str) -> Result<Option<String>, GatewayError> {
    let json = parse_value(data)?;
    let details = &json["step_details"];
    if details["type"] != "tool_calls" {
        return Ok(None);
    }
    Ok(details["tool_calls"]
        .as_array()
        .and_then(|calls| calls.first())
        .and_then(|call| call["type"].as_str())
        .map(String::from))
}

fn error_message(data: &str) -> String {
    serde_json::from_str::<Value>(data)
        .ok()
        .and_then(|json| {
            json["message"]
                .as_str()
                .or_else(|| json["error"]["message"].as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| data.to_string())
}
