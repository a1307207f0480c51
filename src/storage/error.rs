use std::path::Path;
use thiserror::Error;

/// Storage error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse '{path}': {message}")]
    Corrupted { path: String, message: String },
    #[error("Serialization error: {message}")]
    Serialization { message: String },
    #[error("Missing data: {field}")]
    MissingData { field: &'static str },
    #[error("Nothing stored at '{path}'")]
    NotFound { path: String },
}

impl StorageError {
    pub(crate) fn io(path: &Path, error: std::io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
