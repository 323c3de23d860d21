//! Storage module.
//!
//! Provides the sinks finished exports are handed to.

pub mod error;
pub mod traits;

pub mod file;

pub use error::StorageError;
pub use file::FileDownloadSink;
pub use traits::DownloadSink;
