//! Archive packaging for the static bundle.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for the nested folders and files of a bundle.
pub trait ArchiveWriter {
    /// Create a folder; `path` ends with `/`.
    fn add_directory(&mut self, path: &str) -> Result<(), ArchiveError>;

    /// Add a file. Missing parent folders are created.
    fn add_file(&mut self, path: &str, contents: &[u8]) -> Result<(), ArchiveError>;

    /// Finalize into the downloadable bytes.
    fn finish(self) -> Result<Vec<u8>, ArchiveError>
    where
        Self: Sized;
}

/// In-memory ZIP archive using deflate.
pub struct ZipArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    directories: BTreeSet<String>,
}

impl ZipArchiveWriter {
    pub fn new(compression_level: i32) -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level));
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            directories: BTreeSet::new(),
        }
    }

    fn ensure_parents(&mut self, path: &str) -> Result<(), ArchiveError> {
        let mut end = 0;
        while let Some(offset) = path[end..].find('/') {
            end += offset + 1;
            let dir = &path[..end];
            if !self.directories.contains(dir) {
                self.add_directory(dir)?;
            }
        }
        Ok(())
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_directory(&mut self, path: &str) -> Result<(), ArchiveError> {
        let dir = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        if self.directories.insert(dir.clone()) {
            self.zip.add_directory(dir, self.options)?;
        }
        Ok(())
    }

    fn add_file(&mut self, path: &str, contents: &[u8]) -> Result<(), ArchiveError> {
        self.ensure_parents(path)?;
        debug!("Adding {} ({} bytes)", path, contents.len());
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(contents)?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}
