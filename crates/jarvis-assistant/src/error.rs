//! Session-level errors.

use std::path::PathBuf;

use crate::gateway::{IngestionStatus, RunStatus};
use crate::GatewayError;

/// Coarse classification of an `AssistantError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resource,
    NotFound,
    Duplicate,
    Link,
    Run,
    Stream,
    FileNotFound,
    PartialDeletion,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("failed to {action}: {source}")]
    Resource {
        action: String,
        #[source]
        source: GatewayError,
    },

    #[error("service refused to delete {resource} {id}")]
    DeletionRefused { resource: &'static str, id: String },

    #[error("ingestion of file {file_id} ended with status {status}")]
    Ingestion {
        file_id: String,
        status: IngestionStatus,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{resource} has no remote id")]
    Unbound { resource: &'static str },

    #[error("{resource} '{alias}' not found")]
    NotFound { resource: &'static str, alias: String },

    #[error("{resource} '{alias}' already exists")]
    Duplicate { resource: &'static str, alias: String },

    #[error("cannot link vector store: {0}")]
    Link(String),

    #[error("run ended with status {status}")]
    Run { status: RunStatus },

    #[error("response stream failed: {0}")]
    Stream(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to delete files: {}", remaining.join(", "))]
    PartialDeletion { remaining: Vec<String> },
}

impl AssistantError {
    pub(crate) fn resource(action: impl Into<String>, source: GatewayError) -> Self {
        AssistantError::Resource {
            action: action.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::Resource { .. }
            | AssistantError::DeletionRefused { .. }
            | AssistantError::Ingestion { .. }
            | AssistantError::Io { .. }
            | AssistantError::Unbound { .. } => ErrorKind::Resource,
            AssistantError::NotFound { .. } => ErrorKind::NotFound,
            AssistantError::Duplicate { .. } => ErrorKind::Duplicate,
            AssistantError::Link(_) => ErrorKind::Link,
            AssistantError::Run { .. } => ErrorKind::Run,
            AssistantError::Stream(_) => ErrorKind::Stream,
            AssistantError::FileNotFound(_) => ErrorKind::FileNotFound,
            AssistantError::PartialDeletion { .. } => ErrorKind::PartialDeletion,
        }
    }
}

impl From<AssistantError> for jarvis_common::JarvisError {
    fn from(err: AssistantError) -> Self {
        jarvis_common::JarvisError::Assistant(err.to_string())
    }
}
