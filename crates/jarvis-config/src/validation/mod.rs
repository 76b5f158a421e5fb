//! Full configuration validation.
//!
//! Validates numeric ranges and free-form identifiers the remote service
//! would reject. Each section has its own check; this orchestrator calls
//! them all and collects errors into a single `ConfigError`.

mod helpers;
mod misc;


use crate::schema::JarvisConfig;
use jarvis_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &JarvisConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    misc::validate_assistant(&mut errors, config);
    misc::validate_vector_store(&mut errors, config);
    misc::validate_runs(&mut errors, config);
    misc::validate_voice(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
