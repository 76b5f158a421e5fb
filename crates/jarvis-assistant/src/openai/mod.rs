//! OpenAI Assistants API gateway.
//!
//! Implements `AssistantGateway` over the Assistants v2 REST API
//! (https://api.openai.com/v1) with server-sent events for streamed runs.

mod api;
mod client;
mod config;

pub use client::OpenAiGateway;
pub use config::{OpenAiConfig, OPENAI_API_KEY_VAR};

pub(crate) use client::check_status;
pub(crate) use config::DEFAULT_BASE_URL;
