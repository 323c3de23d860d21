//! Error types shared across the content model and the export pipeline.

use crate::export::archive::ArchiveError;
use thiserror::Error;

/// Content-model mutation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {entity_id}")]
    NotFound {
        entity_type: &'static str,
        entity_id: String,
    },
    /// Identifier already taken within its scope
    #[error("Duplicate {entity_type} id: {entity_id}")]
    Duplicate {
        entity_type: &'static str,
        entity_id: String,
    },
    /// Identifier is not a lowercase slug
    #[error("Invalid {entity_type} id '{entity_id}': expected a lowercase slug")]
    InvalidId {
        entity_type: &'static str,
        entity_id: String,
    },
    /// Version spec kinds disagree with the service protocol
    #[error(
        "Protocol mismatch: service {service_id} is {protocol} but version {version} only carries a {found} spec"
    )]
    ProtocolMismatch {
        service_id: String,
        version: String,
        protocol: String,
        found: String,
    },
}

/// Snapshot loading errors. A failed load never touches the current project.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid JSON file format: {0}")]
    InvalidFormat(String),
    #[error("Failed to read project file: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal export errors. Per-image and per-spec problems never surface here.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize {document}: {source}")]
    Serialize {
        document: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to export: {0}")]
    Archive(#[from] ArchiveError),
}
