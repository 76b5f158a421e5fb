use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum JarvisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("assistant error: {0}")]
    Assistant(String),

    #[error("speech error: {0}")]
    Speech(String),

    #[error("{0}")]
    Other(String),
}
