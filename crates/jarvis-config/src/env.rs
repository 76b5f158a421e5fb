//! Environment overrides applied on top of the TOML file.

use crate::schema::JarvisConfig;

/// Pre-existing assistant to reuse instead of creating one.
pub const ASSISTANT_ID_VAR: &str = "ASSISTANT_ID";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut JarvisConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` to resolve variables.
///
/// Blank values are ignored so an empty `ASSISTANT_ID=` line in a `.env`
/// file does not select a nonexistent assistant.
pub fn apply_overrides_with(config: &mut JarvisConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(id) = lookup(ASSISTANT_ID_VAR) {
        let id = id.trim();
        if !id.is_empty() {
            tracing::debug!(assistant_id = %id, "assistant id taken from environment");
            config.assistant.id = Some(id.to_string());
        }
    }
}
