//! Events emitted by a streamed run.

use futures_util::stream::BoxStream;

use super::types::{MessageObject, RunObject};
use crate::GatewayError;

/// One decoded event of a streamed run, in arrival order.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The run was created (`thread.run.created`).
    RunCreated(RunObject),
    /// A non-terminal status change (queued, in progress, cancelling).
    RunUpdated(RunObject),
    /// The run paused for local tool outputs.
    RequiresAction(RunObject),
    RunCompleted(RunObject),
    /// The run stopped without completing (failed, cancelled, expired,
    /// incomplete).
    RunEnded(RunObject),
    /// The assistant started a new message.
    MessageCreated(MessageObject),
    /// An incremental text fragment of the current message.
    TextDelta(String),
    /// The message is finished, with its final text and annotations.
    MessageCompleted(MessageObject),
    /// A run step started a tool call of the given type.
    ToolCallCreated { kind: String },
    /// Server-reported error.
    Error(String),
    /// End of stream marker.
    Done,
}

pub type RunEventStream = BoxStream<'static, Result<RunEvent, GatewayError>>;
