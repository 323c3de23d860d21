//! Content model and export pipeline for API documentation projects.
//!
//! A project (products, services, versions, release notes, info cards and
//! embedded images) lives in memory as [`models::ProjectData`]. It can be saved
//! as a reloadable JSON snapshot or exported as a static bundle of per-entity
//! JSON documents, spec files, images and a search index packaged in a ZIP.

pub mod config;
pub mod error;
pub mod export;
pub mod imaging;
pub mod models;
pub mod services;
pub mod storage;

pub use config::ExportConfig;
pub use error::{ExportError, LoadError, ModelError};
pub use export::BundleExporter;
pub use models::ProjectData;
