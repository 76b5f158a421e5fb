//! Session configuration types.

use jarvis_common::LanguageModel;

use crate::gateway::Tool;

pub const DEFAULT_NAME: &str = "Assistant";
pub const DEFAULT_INSTRUCTIONS: &str = "You are a simple chat bot.";

/// Local mirror of the remote assistant's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub name: String,
    pub instructions: String,
    pub model: LanguageModel,
    /// Always contains `Tool::FileSearch` exactly once.
    pub tools: Vec<Tool>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            model: LanguageModel::default(),
            tools: vec![Tool::FileSearch],
        }
    }
}

impl AssistantConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_model(mut self, model: LanguageModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = with_file_search(tools);
        self
    }
}

/// Drop caller-supplied file search entries and append exactly one.
pub(crate) fn with_file_search(tools: Vec<Tool>) -> Vec<Tool> {
    let mut tools: Vec<Tool> = tools.into_iter().filter(|t| !t.is_file_search()).collect();
    tools.push(Tool::FileSearch);
    tools
}

/// Where a vector store is linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope<'a> {
    /// Every thread of the assistant.
    Assistant,
    /// One thread, by alias.
    Thread(&'a str),
}
