//! Export pipeline.
//!
//! This module contains the snapshot format, the static bundle layout, the search
//! index and archive packaging, plus [`BundleExporter`], which runs the image
//! optimizer ahead of either output.

pub mod archive;
pub mod bundle;
pub mod paths;
pub mod search_index;
pub mod snapshot;

// Re-export for convenience
pub use archive::{ArchiveError, ArchiveWriter, ZipArchiveWriter};
pub use bundle::{StaticBundle, StaticBundleExporter};
pub use search_index::{SearchIndex, SearchIndexExporter, SearchIndexItem, SearchItemType};
pub use snapshot::SnapshotExporter;

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::imaging::ImageOptimizer;
use crate::models::ProjectData;
use chrono::{DateTime, Utc};
use tracing::info;

pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_ZIP: &str = "application/zip";

/// A finished export ready to hand to a download sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Runs image optimization and then one of the two export modes.
///
/// Exports work on an optimized copy; the caller's project is never modified.
#[derive(Clone)]
pub struct BundleExporter {
    config: ExportConfig,
    optimizer: ImageOptimizer,
}

impl BundleExporter {
    pub fn new(config: ExportConfig) -> Self {
        let optimizer = ImageOptimizer::new(config.images.clone());
        Self { config, optimizer }
    }

    pub fn with_optimizer(config: ExportConfig, optimizer: ImageOptimizer) -> Self {
        Self { config, optimizer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Mode A: the whole project as a reloadable JSON snapshot.
    pub async fn export_snapshot(&self, project: &ProjectData) -> Result<ExportedFile, ExportError> {
        let now = Utc::now();
        let optimized = self.optimizer.optimize_project(project).await;
        let json = SnapshotExporter::export_project(optimized, now)?;
        info!("Exported project snapshot ({} bytes)", json.len());
        Ok(ExportedFile {
            file_name: paths::snapshot_file_name(&self.config.snapshot_file_prefix, now),
            media_type: MEDIA_TYPE_JSON,
            bytes: json.into_bytes(),
        })
    }

    /// Mode B without packaging: the bundle files in memory.
    pub async fn build_static_bundle(
        &self,
        project: &ProjectData,
        generated_at: DateTime<Utc>,
    ) -> Result<StaticBundle, ExportError> {
        let optimized = self.optimizer.optimize_project(project).await;
        StaticBundleExporter::export_project(&optimized, generated_at)
    }

    /// Mode B: the static bundle packaged as a ZIP archive.
    pub async fn export_static_bundle(
        &self,
        project: &ProjectData,
    ) -> Result<ExportedFile, ExportError> {
        let writer = ZipArchiveWriter::new(self.config.compression_level);
        self.export_static_bundle_with(project, writer).await
    }

    /// Mode B into any archive writer. Packaging errors abort the export.
    pub async fn export_static_bundle_with<W: ArchiveWriter>(
        &self,
        project: &ProjectData,
        mut writer: W,
    ) -> Result<ExportedFile, ExportError> {
        let now = Utc::now();
        let bundle = self.build_static_bundle(project, now).await?;
        bundle.write_to(&mut writer, &self.config.root_prefix())?;
        let bytes = writer.finish()?;
        info!(
            "Exported static bundle: {} files, {} bytes",
            bundle.len(),
            bytes.len()
        );
        Ok(ExportedFile {
            file_name: paths::bundle_file_name(&self.config.bundle_file_prefix, now),
            media_type: MEDIA_TYPE_ZIP,
            bytes,
        })
    }
}
