//! Error types for the sandboxed cache store.

use std::path::PathBuf;

/// Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheStoreError>;

/// Errors that can occur during cache store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheStoreError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry name is not a plain file name inside the store
    #[error("Invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Entry does not exist
    #[error("Cache entry not found: {name}")]
    NotFound { name: String },

    /// Directory creation failed
    #[error("Failed to create directory: {path:?} - {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
