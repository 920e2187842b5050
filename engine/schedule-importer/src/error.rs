//! Error types for the schedule importer

use thiserror::Error;

/// Result type alias for importer operations
pub type Result<T> = std::result::Result<T, ImporterError>;

/// Errors that can occur while loading, exporting or storing games
#[derive(Error, Debug)]
pub enum ImporterError {
    /// I/O errors (input and output files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration sources could not be read or merged
    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    /// Configuration values are out of bounds
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reference tables could not be loaded
    #[error("Validator error: {0}")]
    Validator(#[from] game_validator::ValidatorError),

    /// Input file has an unsupported format
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

impl ImporterError {
    /// Create a new invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new unsupported input error
    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }
}
