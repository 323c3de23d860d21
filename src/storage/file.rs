//! File-based download sink: writes finished exports into an output directory.

use super::{StorageError, traits::DownloadSink};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct FileDownloadSink {
    output_dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        let invalid = file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\']);
        if invalid {
            return Err(StorageError::InvalidFileName {
                file_name: file_name.to_string(),
            });
        }
        Ok(self.output_dir.join(file_name))
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn save(
        &self,
        bytes: &[u8],
        media_type: &str,
        file_name: &str,
    ) -> Result<(), StorageError> {
        let path = self.target(file_name)?;
        let write_error = |e: std::io::Error| StorageError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, bytes).await.map_err(write_error)?;
        info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            media_type,
            bytes.len()
        );
        Ok(())
    }
}
