//! Export configuration.
//!
//! Defaults cover the common case. A YAML file named by `API_DOCS_CONFIG` can
//! replace them, and `API_DOCS_ROOT_FOLDER` / `API_DOCS_COMPRESSION_LEVEL`
//! override single values on top.

use crate::models::ImageRole;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const ENV_CONFIG_FILE: &str = "API_DOCS_CONFIG";
pub const ENV_ROOT_FOLDER: &str = "API_DOCS_ROOT_FOLDER";
pub const ENV_COMPRESSION_LEVEL: &str = "API_DOCS_COMPRESSION_LEVEL";

pub const DEFAULT_ROOT_FOLDER: &str = "data/";
/// Deflate level for the bundle archive (medium).
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 6;

/// Re-encode quality (1-100) per source kind for one image role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuality {
    pub png_source: u8,
    pub other_source: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptimizerConfig {
    /// PNG payloads below this decoded size are left alone.
    pub png_threshold_bytes: usize,
    /// Other raster payloads below this decoded size are left alone.
    pub raster_threshold_bytes: usize,
    pub icon: RoleQuality,
    pub hero: RoleQuality,
    pub gallery: RoleQuality,
}

impl Default for ImageOptimizerConfig {
    fn default() -> Self {
        Self {
            png_threshold_bytes: 150 * 1024,
            raster_threshold_bytes: 80 * 1024,
            icon: RoleQuality {
                png_source: 80,
                other_source: 70,
            },
            hero: RoleQuality {
                png_source: 92,
                other_source: 85,
            },
            gallery: RoleQuality {
                png_source: 80,
                other_source: 70,
            },
        }
    }
}

impl ImageOptimizerConfig {
    pub fn threshold_for(&self, png: bool) -> usize {
        if png {
            self.png_threshold_bytes
        } else {
            self.raster_threshold_bytes
        }
    }

    pub fn quality_for(&self, role: ImageRole, png: bool) -> u8 {
        let quality = match role {
            ImageRole::Icon => self.icon,
            ImageRole::Hero => self.hero,
            ImageRole::Gallery => self.gallery,
        };
        if png {
            quality.png_source
        } else {
            quality.other_source
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Folder inside the bundle archive holding every document.
    pub root_folder: String,
    pub compression_level: i32,
    pub snapshot_file_prefix: String,
    pub bundle_file_prefix: String,
    pub images: ImageOptimizerConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            snapshot_file_prefix: "api-docs-project".to_string(),
            bundle_file_prefix: "api-docs-static".to_string(),
            images: ImageOptimizerConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ExportConfig =
            serde_yaml::from_str(yaml).context("Failed to parse export config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read export config: {:?}", path))?;
        Self::from_yaml_str(&yaml)
    }

    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => {
                info!("Loading export config from {}", path);
                Self::from_yaml_file(Path::new(&path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(root) = std::env::var(ENV_ROOT_FOLDER) {
            config.root_folder = root;
        }
        if let Ok(level) = std::env::var(ENV_COMPRESSION_LEVEL) {
            config.compression_level = level
                .trim()
                .parse()
                .with_context(|| format!("{ENV_COMPRESSION_LEVEL} is not an integer: {level}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=9).contains(&self.compression_level) {
            bail!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            );
        }
        for (role, quality) in [
            ("icon", self.images.icon),
            ("hero", self.images.hero),
            ("gallery", self.images.gallery),
        ] {
            for value in [quality.png_source, quality.other_source] {
                if !(1..=100).contains(&value) {
                    bail!("{role} quality must be between 1 and 100, got {value}");
                }
            }
        }
        if self.root_folder.split('/').any(|segment| segment == "..") {
            bail!("root_folder must not escape the archive: {}", self.root_folder);
        }
        Ok(())
    }

    /// Root folder normalized to either `""` or `"name/"`.
    pub fn root_prefix(&self) -> String {
        let trimmed = self.root_folder.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        }
    }
}
