//! Stream callbacks and the console handler.

use std::io::Write;

use serde_json::Value;

use crate::tools::ToolExecutor;

/// A resolved citation of a completed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Position of the `[index]` marker in the rewritten text.
    pub index: usize,
    pub file_id: String,
    /// Display name of the cited file.
    pub filename: String,
}

/// Callbacks invoked while a run streams. All methods have no-op defaults
/// except `on_tool_call`, which refuses calls it cannot execute.
pub trait StreamHandler: Send {
    /// A new assistant message started.
    fn on_text_created(&mut self) {}

    fn on_text_delta(&mut self, _delta: &str) {}

    /// The run started a tool call of type `kind` (e.g. `"file_search"`).
    fn on_tool_call_created(&mut self, _kind: &str) {}

    /// A message finished. `text` has annotation markers replaced by
    /// `[index]`.
    fn on_message_done(&mut self, _text: &str, _citations: &[Citation]) {}

    /// Execute a function call. `Ok` is submitted as the tool output.
    fn on_tool_call(&mut self, name: &str, _arguments: &Value) -> Result<String, String> {
        Err(format!("no executor registered for function '{name}'"))
    }

    /// The stream faulted and will be aborted.
    fn on_exception(&mut self, _message: &str) {}
}

/// Prints a run to a terminal as it streams.
pub struct ConsoleHandler {
    name: String,
    out: Box<dyn Write + Send>,
    transcript: String,
    executor: Option<ToolExecutor>,
}

impl ConsoleHandler {
    /// Handler printing to stdout, prefixing messages with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_writer(name, Box::new(std::io::stdout()))
    }

    pub fn with_writer(name: impl Into<String>, out: Box<dyn Write + Send>) -> Self {
        Self {
            name: name.into(),
            out,
            transcript: String::new(),
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Everything printed so far.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn take_transcript(&mut self) -> String {
        std::mem::take(&mut self.transcript)
    }

    fn emit(&mut self, text: &str) {
        self.transcript.push_str(text);
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl StreamHandler for ConsoleHandler {
    fn on_text_created(&mut self) {
        let prefix = format!("\n{} > ", self.name);
        self.emit(&prefix);
    }

    fn on_text_delta(&mut self, delta: &str) {
        self.emit(delta);
    }

    fn on_tool_call_created(&mut self, kind: &str) {
        let notice = format!(
            "\n{} > Using the {} tool.\n",
            self.name,
            kind.replace('_', " ")
        );
        self.emit(&notice);
    }

    fn on_message_done(&mut self, _text: &str, citations: &[Citation]) {
        if citations.is_empty() {
            self.emit("\n");
            return;
        }
        let sources: Vec<String> = citations
            .iter()
            .map(|c| format!("[{}] {}", c.index, c.filename))
            .collect();
        let line = format!("\nSources: {}\n", sources.join(", "));
        self.emit(&line);
    }

    fn on_tool_call(&mut self, name: &str, arguments: &Value) -> Result<String, String> {
        match &self.executor {
            Some(executor) => executor(name, arguments),
            None => Err(format!("no executor registered for function '{name}'")),
        }
    }

    fn on_exception(&mut self, message: &str) {
        let line = format!("\n{} > error: {message}\n", self.name);
        self.emit(&line);
    }
}
