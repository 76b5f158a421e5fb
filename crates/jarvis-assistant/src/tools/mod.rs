//! Local tools the assistant can call during a run.
//!
//! Function tools are declared to the service up front and executed here
//! when a run pauses on `requires_action`.

mod definitions;
mod sandbox;

use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

pub use definitions::{builtin_functions, CODE_SNIPPET_FILE, OPEN_WEBPAGE, WRITE_CODE_SNIPPET};
pub use sandbox::ToolSandbox;

/// Callback for executing tool calls. Takes a function name and its decoded
/// arguments. `Ok` output is submitted to the run; `Err` aborts the stream.
pub type ToolExecutor = Box<dyn Fn(&str, &Value) -> Result<String, String> + Send + Sync>;

type UrlOpener = Box<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// Executor for the built-in functions (`open_webpage`, `write_code_snippet`).
///
/// Tool-level failures are reported back to the model as `"Failed: ..."`
/// outputs; only an unknown function name is an executor error.
pub struct BuiltinTools {
    sandbox: ToolSandbox,
    opener: UrlOpener,
}

impl BuiltinTools {
    /// Tools writing into `workdir`.
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            sandbox: ToolSandbox::new(workdir),
            opener: Box::new(open_in_browser),
        }
    }

    /// Replace the browser launcher.
    pub fn with_opener(
        mut self,
        opener: impl Fn(&str) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn execute(&self, name: &str, arguments: &Value) -> Result<String, String> {
        match name {
            OPEN_WEBPAGE => Ok(self.open_webpage(arguments)),
            WRITE_CODE_SNIPPET => Ok(self.write_code_snippet(arguments)),
            other => Err(format!("unknown function '{other}'")),
        }
    }

    pub fn into_executor(self) -> ToolExecutor {
        Box::new(move |name, arguments| self.execute(name, arguments))
    }

    fn open_webpage(&self, arguments: &Value) -> String {
        let Some(url) = arguments.get("url").and_then(Value::as_str) else {
            return "Failed: missing 'url' argument".to_string();
        };

        // Only allow http:// and https:// schemes
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warn!(url, "refusing to open non-http URL");
            return "Failed: only http:// and https:// URLs can be opened".to_string();
        }

        match (self.opener)(url) {
            Ok(()) => {
                info!(url, "opened webpage");
                "Success".to_string()
            }
            Err(e) => {
                warn!(url, error = %e, "failed to open webpage");
                format!("Failed: {e}")
            }
        }
    }

    fn write_code_snippet(&self, arguments: &Value) -> String {
        let Some(snippet) = arguments.get("codeSnippet").and_then(Value::as_str) else {
            return "Failed: missing 'codeSnippet' argument".to_string();
        };

        let path = match self.sandbox.target(CODE_SNIPPET_FILE) {
            Ok(path) => path,
            Err(e) => return format!("Failed: {e}"),
        };

        match std::fs::write(&path, snippet) {
            Ok(()) => {
                info!(path = %path.display(), bytes = snippet.len(), "wrote code snippet");
                "Success".to_string()
            }
            Err(e) => format!("Failed: {e}"),
        }
    }
}

/// Open `url` with the platform's default handler.
fn open_in_browser(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = std::process::Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        std::process::Command::new("xdg-open")
    };
    command.arg(url).spawn().map(|_| ())
}
