//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entity not found.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Invalid data or an operation the store cannot apply.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
