//! Reading a `JarvisConfig` out of a TOML file.
//!
//! Parsing only; range checks run in [`crate::load_config`] once
//! environment overrides are applied.

use std::io::ErrorKind;
use std::path::Path;

use jarvis_common::ConfigError;
use tracing::debug;

use crate::schema::JarvisConfig;

use super::paths::{create_default_config, default_config_path};

/// Parse the TOML file at `path`. Missing sections and keys take their
/// defaults.
pub fn load_from_path(path: &Path) -> Result<JarvisConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config = toml::from_str::<JarvisConfig>(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "config parsed");
    Ok(config)
}

/// Parse the per-user config file, writing the commented template there
/// first when it does not exist yet.
pub fn load_default() -> Result<JarvisConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        create_default_config(&path)?;
    }
    load_from_path(&path)
}
