//! Streamed responses.
//!
//! A `ResponseStream` consumes the events of one run and dispatches them to
//! a `StreamHandler`. Tool calls requested by the run are executed through
//! the handler and their outputs resubmitted on the same run.

mod handler;
mod processor;

pub use handler::{Citation, ConsoleHandler, StreamHandler};
pub use processor::{ResponseStream, StreamState, StreamSummary, DEFAULT_MAX_TOOL_ROUNDS};
