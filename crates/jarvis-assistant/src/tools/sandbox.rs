//! Working directory that tool writes are confined to.

use std::path::{Component, Path, PathBuf};

/// File names tools may never create, even inside the working directory.
const PROTECTED_NAMES: &[&str] = &[".env", ".git", ".ssh", ".aws", ".gnupg"];

#[derive(Debug, Clone)]
pub struct ToolSandbox {
    root: PathBuf,
}

impl ToolSandbox {
    /// Confine writes to `root`, canonicalized when it exists.
    pub fn new(root: PathBuf) -> Self {
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file_name` directly inside the root.
    ///
    /// `file_name` must be a single plain component. An existing target
    /// that resolves outside the root (through a symlink) is refused.
    pub fn target(&self, file_name: &str) -> Result<PathBuf, String> {
        let mut components = Path::new(file_name).components();
        let name = match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => name,
            _ => return Err(format!("'{file_name}' is not a plain file name")),
        };
        if PROTECTED_NAMES.iter().any(|p| name == *p) {
            return Err(format!("'{file_name}' is protected"));
        }

        let path = self.root.join(name);
        if let Ok(resolved) = std::fs::canonicalize(&path) {
            if !resolved.starts_with(&self.root) {
                return Err(format!(
                    "'{}' resolves outside '{}'",
                    path.display(),
                    self.root.display()
                ));
            }
        }
        Ok(path)
    }
}
