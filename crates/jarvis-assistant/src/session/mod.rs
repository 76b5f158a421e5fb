//! Assistant session management.
//!
//! An `AssistantSession` mirrors one remote assistant, owns the alias
//! registry of its conversation threads and drives runs on them, polled or
//! streamed.

mod chat;
mod manager;
mod threads;
mod types;

pub use manager::AssistantSession;
pub use types::{AssistantConfig, LinkScope, DEFAULT_INSTRUCTIONS, DEFAULT_NAME};

#[cfg(test)]
mod tests;
