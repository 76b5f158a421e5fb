//! Assistant and vector store configuration types.

use jarvis_common::LanguageModel;
use serde::{Deserialize, Serialize};

/// Remote assistant settings.
///
/// `id` selects a pre-existing assistant; when unset a new one is created
/// from the remaining fields. The `ASSISTANT_ID` environment variable
/// overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub instructions: String,
    pub model: LanguageModel,
    /// Alias of the conversation thread the CLI talks on.
    pub thread: String,
    /// Register the built-in local functions as assistant tools.
    pub enable_functions: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: "Jarvis".into(),
            instructions: "You are a simple chat bot.".into(),
            model: LanguageModel::default(),
            thread: "MAIN_THREAD".into(),
            enable_functions: true,
        }
    }
}

/// Settings for vector stores created on demand (e.g. `--attach`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub name: String,
    /// Days of inactivity before the remote store expires (valid range: 1-365).
    pub lifetime_days: u32,
    /// Delete the store and its files when the CLI exits.
    pub delete_on_exit: bool,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            name: "jarvis-documents".into(),
            lifetime_days: 1,
            delete_on_exit: true,
        }
    }
}
