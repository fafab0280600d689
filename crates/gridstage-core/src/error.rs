//! Error types for Gridstage

use thiserror::Error;

/// Core error type for Gridstage operations
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Commit error: {0}")]
    Commit(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Row index out of bounds: {0}")]
    RowOutOfBounds(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Gridstage operations
pub type Result<T> = std::result::Result<T, GridError>;
