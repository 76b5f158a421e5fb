//! Location of the per-user config file.

use std::path::{Path, PathBuf};

use jarvis_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "jarvis";
const CONFIG_FILE: &str = "config.toml";

/// `<config dir>/jarvis/config.toml`, e.g. `~/.config/jarvis/config.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| {
            ConfigError::ParseError("no per-user config directory on this platform".into())
        })
}

/// Write the commented template to `path` unless a file is already there.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config_toml())
    };
    write().map_err(|e| {
        ConfigError::ParseError(format!(
            "cannot write config template to {}: {e}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "config template written");
    Ok(())
}
