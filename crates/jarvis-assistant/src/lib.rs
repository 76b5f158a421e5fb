//! Assistant session engine for Jarvis.
//!
//! Keeps local state consistent with a remote assistant service:
//! - `AssistantSession`: assistant configuration, named threads, runs
//! - `VectorStore`: a remote document index with named files
//! - `ResponseStream`: drives one streamed run (text, citations, tool calls)
//! - `AssistantGateway`: the remote service boundary, implemented over HTTP
//!   by `OpenAiGateway`
//! - Speech-to-text and text-to-speech clients for the voice loop

pub mod error;
pub mod gateway;
pub mod openai;
pub mod registry;
pub mod session;
pub mod speech;
pub mod stream;
pub mod streaming;
pub mod token_tracker;
pub mod tools;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{AssistantError, ErrorKind};
pub use gateway::{AssistantGateway, RunEvent, RunEventStream};
pub use openai::{OpenAiConfig, OpenAiGateway};
pub use registry::AliasRegistry;
pub use session::{AssistantConfig, AssistantSession, LinkScope};
pub use speech::{SpeechClient, SpeechConfig};
pub use stream::{ConsoleHandler, ResponseStream, StreamHandler, StreamState, StreamSummary};
pub use token_tracker::TokenTracker;
pub use tools::{BuiltinTools, ToolExecutor};
pub use vector_store::{VectorStore, VectorStoreSettings};

/// Transport-level failures reported by a gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::ParseError(err.to_string())
        } else {
            GatewayError::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_display() {
        assert_eq!(
            GatewayError::ApiError("HTTP 500: boom".into()).to_string(),
            "API error: HTTP 500: boom"
        );
        assert_eq!(
            GatewayError::NotFound("assistant asst_9".into()).to_string(),
            "not found: assistant asst_9"
        );
        assert_eq!(GatewayError::RateLimited.to_string(), "Rate limited");
        assert_eq!(GatewayError::Timeout.to_string(), "Timeout");
    }
}
