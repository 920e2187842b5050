//! Error types for the game validator
//!
//! Malformed game data is never an error here; it is reported through
//! [`crate::Issue`]s. These errors cover loading and checking the reference tables.

use thiserror::Error;

/// Result type alias for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Errors that can occur while preparing a validator
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// I/O errors while reading table files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors while decoding table files
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reference tables are inconsistent
    #[error("Invalid reference tables: {0}")]
    InvalidTables(String),
}

impl ValidatorError {
    /// Create a new invalid tables error
    pub fn invalid_tables(msg: impl Into<String>) -> Self {
        Self::InvalidTables(msg.into())
    }
}
