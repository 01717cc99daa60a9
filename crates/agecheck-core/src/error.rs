use thiserror::Error;

/// Top-level error type for the shared agecheck types.
#[derive(Error, Debug)]
pub enum AgeCheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid graph name {name:?}: {reason}")]
    InvalidGraphName { name: String, reason: &'static str },

    #[error("Invalid connection config: {0}")]
    InvalidConnection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for AgeCheckError {
    fn from(err: config::ConfigError) -> Self {
        AgeCheckError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgeCheckError>;
