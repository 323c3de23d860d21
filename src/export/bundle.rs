//! Static-site bundle generator.
//!
//! Lays the project out as per-entity JSON documents, extracted spec files and
//! image assets. Embedded images are written as files and their references in
//! the documents are rewritten to the asset paths.

use super::archive::{ArchiveError, ArchiveWriter};
use super::paths::{self, DEFAULT_SERVICE_ICON_PATH, extension_for_media_type};
use super::search_index::SearchIndexExporter;
use crate::error::ExportError;
use crate::models::{
    ApiVersion, EmbeddedImage, InfoCard, Product, ProjectData, Service, latest_version,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_SERVICE_ICON_SVG: &str = include_str!("assets/default-service-icon.svg");

/// The files of a static bundle, keyed by path relative to the bundle root.
#[derive(Debug, Clone, Default)]
pub struct StaticBundle {
    files: BTreeMap<String, Vec<u8>>,
}

impl StaticBundle {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn json(&self, path: &str) -> Option<Value> {
        self.get(path)
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file under `root_prefix` (`""` or `"name/"`).
    pub fn write_to<W: ArchiveWriter>(
        &self,
        writer: &mut W,
        root_prefix: &str,
    ) -> Result<(), ArchiveError> {
        if !root_prefix.is_empty() {
            writer.add_directory(root_prefix)?;
        }
        for (path, contents) in &self.files {
            writer.add_file(&format!("{root_prefix}{path}"), contents)?;
        }
        Ok(())
    }
}

/// Exporter for the static bundle layout.
pub struct StaticBundleExporter;

impl StaticBundleExporter {
    /// Build the bundle. Images are expected to be optimized already.
    pub fn export_project(
        project: &ProjectData,
        generated_at: DateTime<Utc>,
    ) -> Result<StaticBundle, ExportError> {
        let mut builder = BundleBuilder {
            project,
            files: BTreeMap::new(),
        };

        let mut manifest = project.manifest.clone();
        manifest.counts = project.counts();
        manifest.refresh_timestamps(generated_at);
        builder.put_json("manifest.json", &manifest)?;

        builder.put_bytes(DEFAULT_SERVICE_ICON_PATH, DEFAULT_SERVICE_ICON_SVG.as_bytes());

        let mut product_list = Vec::with_capacity(project.products.len());
        for product in &project.products {
            product_list.push(builder.add_product(product)?);
        }
        builder.put_json("products.json", &product_list)?;

        let cards: Vec<Value> = project
            .info_cards
            .iter()
            .map(|card| {
                builder.card_document(card, |ext| paths::info_card_image_path(&card.id, ext))
            })
            .collect::<Result<_, _>>()?;
        builder.put_json("info-cards.json", &cards)?;

        let index = SearchIndexExporter::export_project(project);
        builder.put_json("search-index.json", &index)?;

        debug!("Static bundle has {} files", builder.files.len());
        Ok(StaticBundle {
            files: builder.files,
        })
    }
}

struct BundleBuilder<'a> {
    project: &'a ProjectData,
    files: BTreeMap<String, Vec<u8>>,
}

impl BundleBuilder<'_> {
    fn put_bytes(&mut self, path: &str, bytes: &[u8]) {
        self.files.insert(path.to_string(), bytes.to_vec());
    }

    fn put_json<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> Result<(), ExportError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| ExportError::Serialize {
            document: path.to_string(),
            source,
        })?;
        self.files.insert(path.to_string(), bytes);
        Ok(())
    }

    /// Write an image asset and return the value that replaces it in documents:
    /// the asset path, the original reference for external images, or null when
    /// the payload cannot be read.
    fn stage_image(
        &mut self,
        image: Option<&EmbeddedImage>,
        path_for: impl FnOnce(&str) -> String,
    ) -> Value {
        let Some(image) = image else {
            return Value::Null;
        };
        if !image.is_inline() {
            return Value::String(image.as_str().to_string());
        }
        let path = path_for(extension_for_media_type(image.media_type().unwrap_or_default()));
        match image.decode() {
            Ok(bytes) => {
                self.files.insert(path.clone(), bytes);
                Value::String(path)
            }
            Err(e) => {
                warn!("Skipping image asset {}: {}", path, e);
                Value::Null
            }
        }
    }

    fn card_document(
        &mut self,
        card: &InfoCard,
        path_for: impl FnOnce(&str) -> String,
    ) -> Result<Value, ExportError> {
        let mut doc = to_object(card, "info card")?;
        let image = self.stage_image(card.image.as_ref(), path_for);
        doc.insert("image".to_string(), image);
        Ok(Value::Object(doc))
    }

    /// Write a product, its services and versions; return its `products.json` entry.
    fn add_product(&mut self, product: &Product) -> Result<Value, ExportError> {
        let project = self.project;
        let services = project.services_for(&product.id);
        let mut doc = to_object(product, "product")?;

        let icon = self.stage_image(product.icon.as_ref(), |ext| {
            paths::product_icon_path(&product.id, ext)
        });
        doc.insert("icon".to_string(), icon);
        let hero = self.stage_image(product.hero_image.as_ref(), |ext| {
            paths::hero_image_path(&product.id, ext)
        });
        doc.insert("hero_image".to_string(), hero);

        let gallery: Vec<Value> = product
            .gallery_images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                self.stage_image(Some(image), |ext| {
                    paths::gallery_image_path(&product.id, i + 1, ext)
                })
            })
            .filter(|value| !value.is_null())
            .collect();
        doc.insert("gallery_images".to_string(), Value::Array(gallery));

        let cards: Vec<Value> = product
            .info_cards
            .iter()
            .map(|card| {
                self.card_document(card, |ext| {
                    paths::product_info_card_image_path(&product.id, &card.id, ext)
                })
            })
            .collect::<Result<_, _>>()?;
        doc.insert("info_cards".to_string(), Value::Array(cards));
        doc.insert("services_count".to_string(), json!(services.len()));

        let list_entry = Value::Object(doc.clone());

        let summaries: Vec<Value> = services
            .iter()
            .map(|service| {
                let versions = project.versions_for(&product.id, &service.id);
                json!({
                    "id": service.id,
                    "name": service.name,
                    "display_name": service.display_name,
                    "short_description": service.short_description,
                    "protocol_type": service.protocol_type,
                    "versions_count": versions.len(),
                    "latest_version": latest_version(versions).map(|v| v.version.clone()),
                })
            })
            .collect();
        doc.insert("services".to_string(), Value::Array(summaries));
        self.put_json(&paths::product_document_path(&product.id), &doc)?;

        for service in services {
            self.add_service(product, service)?;
        }
        Ok(list_entry)
    }

    fn add_service(&mut self, product: &Product, service: &Service) -> Result<(), ExportError> {
        let project = self.project;
        let versions = project.versions_for(&product.id, &service.id);
        let mut doc = to_object(service, "service")?;

        let icon = match self.stage_image(service.icon.as_ref(), |ext| {
            paths::service_icon_path(&product.id, &service.id, ext)
        }) {
            Value::Null => json!(DEFAULT_SERVICE_ICON_PATH),
            staged => staged,
        };
        doc.insert("icon".to_string(), icon);
        doc.insert("product_id".to_string(), json!(product.id));

        let summaries: Vec<Value> = versions
            .iter()
            .map(|v| {
                json!({
                    "version": v.version,
                    "status": v.status,
                    "release_date": v.release_date,
                    "supported_until": v.supported_until,
                })
            })
            .collect();
        doc.insert("versions".to_string(), Value::Array(summaries));
        self.put_json(&paths::service_document_path(&product.id, &service.id), &doc)?;

        for version in versions {
            self.add_version(&product.id, &service.id, version)?;
        }
        Ok(())
    }

    fn add_version(
        &mut self,
        product_id: &str,
        service_id: &str,
        version: &ApiVersion,
    ) -> Result<(), ExportError> {
        let project = self.project;
        let v = version.version.as_str();
        let mut doc = to_object(version, "version")?;

        let specs = project.api_specs_for(product_id, service_id, v);
        // Absent spec kinds are left out of the map, never written as null.
        let mut spec_paths = Map::new();
        if let Some(spec) = specs.and_then(|s| s.openapi.as_ref()) {
            let path = paths::openapi_spec_path(product_id, service_id, v);
            self.put_bytes(&path, spec.raw_text().as_bytes());
            spec_paths.insert("openapi".to_string(), json!(path));
        }
        if let Some(spec) = specs.and_then(|s| s.mqtt.as_ref()) {
            let path = paths::asyncapi_spec_path(product_id, service_id, v);
            self.put_bytes(&path, spec.raw_text().as_bytes());
            spec_paths.insert("mqtt".to_string(), json!(path));
        }
        doc.insert("api_specs".to_string(), Value::Object(spec_paths));

        doc.insert("product_id".to_string(), json!(product_id));
        doc.insert("service_id".to_string(), json!(service_id));
        doc.insert(
            "release_notes_url".to_string(),
            json!(paths::release_note_path(product_id, service_id, v)),
        );
        let examples_dir = paths::examples_dir(product_id, service_id, v);
        doc.insert("examples_url".to_string(), json!(examples_dir));
        self.put_json(&paths::version_document_path(product_id, service_id, v), &doc)?;

        if let Some(note) = project.release_note(product_id, service_id, v) {
            self.put_json(&paths::release_note_path(product_id, service_id, v), note)?;
        }
        if let Some(examples) = project.example_set(product_id, service_id, v) {
            if let Some(requests) = &examples.requests {
                self.put_json(&format!("{examples_dir}requests.json"), requests)?;
            }
            if let Some(responses) = &examples.responses {
                self.put_json(&format!("{examples_dir}responses.json"), responses)?;
            }
        }
        Ok(())
    }
}

fn to_object<T: Serialize>(value: &T, document: &str) -> Result<Map<String, Value>, ExportError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(source) => Err(ExportError::Serialize {
            document: document.to_string(),
            source,
        }),
    }
}
