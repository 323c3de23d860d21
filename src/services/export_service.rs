//! Export service for saving snapshots and static bundles through a download sink.

use crate::export::{BundleExporter, ExportedFile};
use crate::models::ProjectData;
use crate::storage::DownloadSink;
use anyhow::{Context, Result};

/// Service for coordinating exports and handing the results to a sink.
pub struct ExportService<S> {
    exporter: BundleExporter,
    sink: S,
}

impl<S: DownloadSink> ExportService<S> {
    pub fn new(exporter: BundleExporter, sink: S) -> Self {
        Self { exporter, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Save the project as a JSON snapshot. Returns the file name used.
    pub async fn save_project(&self, project: &ProjectData) -> Result<String> {
        let file = self
            .exporter
            .export_snapshot(project)
            .await
            .context("Failed to save project")?;
        self.deliver(file).await.context("Failed to save project")
    }

    /// Export the static-site bundle. Returns the file name used.
    pub async fn export_static_data(&self, project: &ProjectData) -> Result<String> {
        let file = self
            .exporter
            .export_static_bundle(project)
            .await
            .context("Failed to export static data")?;
        self.deliver(file)
            .await
            .context("Failed to export static data")
    }

    async fn deliver(&self, file: ExportedFile) -> Result<String> {
        self.sink
            .save(&file.bytes, file.media_type, &file.file_name)
            .await?;
        Ok(file.file_name)
    }
}
