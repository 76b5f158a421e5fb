//! Types shared by the Jarvis crates: errors, the language model enum and
//! log correlation ids.

pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, JarvisError};
pub use id::new_correlation_id;
pub use types::{LanguageModel, UnknownModel};
