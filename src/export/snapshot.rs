//! Snapshot format: the whole project as one pretty-printed JSON document.

use crate::error::{ExportError, LoadError};
use crate::models::ProjectData;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("products", "array"),
    ("services", "object"),
    ("versions", "object"),
];

/// Exporter and importer for project snapshots.
pub struct SnapshotExporter;

impl SnapshotExporter {
    /// Serialize a project with its manifest timestamps stamped at `now`.
    pub fn export_project(
        mut project: ProjectData,
        now: DateTime<Utc>,
    ) -> Result<String, ExportError> {
        project.manifest.refresh_timestamps(now);
        serde_json::to_string_pretty(&project).map_err(|source| ExportError::Serialize {
            document: "project snapshot".to_string(),
            source,
        })
    }

    /// Parse a snapshot. Optional sections missing from older files are backfilled.
    pub fn import_project(text: &str) -> Result<ProjectData, LoadError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| LoadError::InvalidFormat(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| LoadError::InvalidFormat("expected a JSON object".to_string()))?;

        for (field, kind) in REQUIRED_FIELDS {
            let present = match object.get(field) {
                Some(Value::Array(_)) => kind == "array",
                Some(Value::Object(_)) => kind == "object",
                _ => false,
            };
            if !present {
                return Err(LoadError::InvalidFormat(format!(
                    "missing or invalid '{field}' ({kind} expected)"
                )));
            }
        }
        let has_manifest = object.contains_key("manifest");

        let mut project: ProjectData =
            serde_json::from_value(value).map_err(|e| LoadError::InvalidFormat(e.to_string()))?;
        if !has_manifest {
            warn!("Snapshot has no manifest, rebuilding counts");
            project.recount();
        }

        info!(
            "Imported snapshot: {} products, {} services, {} versions",
            project.products.len(),
            project.service_count(),
            project.version_count()
        );
        Ok(project)
    }
}
