//! Storage error types for download sinks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageError {
    /// Suggested file name cannot be used as a plain file name
    #[error("Invalid file name: {file_name}")]
    InvalidFileName { file_name: String },
    /// Writing the file failed
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}
