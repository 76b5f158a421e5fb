//! Function definitions exposed to the assistant.

use serde_json::json;

use crate::gateway::{FunctionDefinition, Tool};

pub const OPEN_WEBPAGE: &str = "open_webpage";
pub const WRITE_CODE_SNIPPET: &str = "write_code_snippet";

/// File the snippet tool writes to, relative to the tool working directory.
pub const CODE_SNIPPET_FILE: &str = "Code_Snippet.py";

/// All built-in functions as assistant tools.
pub fn builtin_functions() -> Vec<Tool> {
    vec![
        function(
            OPEN_WEBPAGE,
            "Open a browser window at the given URL. Returns 'Success' if successful, \
             'Failed' if not.",
            json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The URL to open."
                    }
                },
                "required": ["url"]
            }),
        ),
        function(
            WRITE_CODE_SNIPPET,
            "Write the given code snippet to a file named 'Code_Snippet.py'. Returns \
             'Success' if successful, 'Failed' if not.",
            json!({
                "type": "object",
                "properties": {
                    "codeSnippet": {
                        "type": "string",
                        "description": "The code snippet to write."
                    }
                },
                "required": ["codeSnippet"]
            }),
        ),
    ]
}

fn function(name: &str, description: &str, parameters: serde_json::Value) -> Tool {
    Tool::Function {
        function: FunctionDefinition {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters,
        },
    }
}
