//! Storage trait definitions for finished exports.

use super::StorageError;

/// Receives a finished export: the bytes, their media type and a suggested file name.
#[async_trait::async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(
        &self,
        bytes: &[u8],
        media_type: &str,
        file_name: &str,
    ) -> Result<(), StorageError>;
}
