//! Configuration schema types for Jarvis.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Secrets are never part of the schema; they come from the environment.

mod assistant;
mod runs;
mod system;
mod voice;

pub use assistant::*;
pub use runs::*;
pub use system::*;
pub use voice::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Jarvis.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct JarvisConfig {
    pub assistant: AssistantConfig,
    pub vector_store: VectorStoreConfig,
    pub runs: RunsConfig,
    pub voice: VoiceConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
