//! Project service holding the project currently being edited.

use crate::error::LoadError;
use crate::export::SnapshotExporter;
use crate::models::ProjectData;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Owns the single in-memory project of a session.
///
/// Loading replaces the project wholesale and only on success.
#[derive(Debug, Default)]
pub struct ProjectService {
    current: ProjectData,
}

impl ProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(project: ProjectData) -> Self {
        Self { current: project }
    }

    pub fn project(&self) -> &ProjectData {
        &self.current
    }

    pub fn project_mut(&mut self) -> &mut ProjectData {
        &mut self.current
    }

    pub fn into_project(self) -> ProjectData {
        self.current
    }

    /// Replace the current project with a parsed snapshot.
    pub fn load_snapshot(&mut self, text: &str) -> Result<(), LoadError> {
        let project = SnapshotExporter::import_project(text)?;
        self.current = project;
        info!("Loaded project with {} products", self.current.products.len());
        Ok(())
    }

    /// Read and load a snapshot file.
    pub async fn load_snapshot_file(&mut self, path: &Path) -> Result<()> {
        let load = async {
            let text = tokio::fs::read_to_string(path).await.map_err(LoadError::from)?;
            self.load_snapshot(&text)
        };
        load.await
            .with_context(|| format!("Failed to load project file {:?}", path))
    }

    /// Start over with an empty project.
    pub fn reset(&mut self) {
        self.current = ProjectData::new();
        info!("Project reset");
    }
}
