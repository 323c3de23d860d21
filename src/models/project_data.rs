//! The aggregate root of the content model.
//!
//! `ProjectData` is the whole persisted state of a project. Products own their
//! services through the `services` map, services own their versions through the
//! `versions` map, and versions own their release note, spec index entry and
//! example set through the triple-keyed maps. Every mutation goes through the
//! methods below so the maps never drift apart.

use super::api_spec::ApiSpecs;
use super::api_version::ApiVersion;
use super::enums::ProtocolType;
use super::info_card::InfoCard;
use super::manifest::{Manifest, ManifestCounts};
use super::product::Product;
use super::release_note::ReleaseNote;
use super::service::Service;
use crate::error::ModelError;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Values keyed by `(product_id, service_id)`.
pub type ServiceKeyed<T> = BTreeMap<String, BTreeMap<String, T>>;
/// Values keyed by `(product_id, service_id, version)`.
pub type VersionKeyed<T> = BTreeMap<String, BTreeMap<String, BTreeMap<String, T>>>;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").unwrap());
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z.+\-]*$").unwrap());

/// Example request/response documents of one API version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExampleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub examples: VersionKeyed<ExampleSet>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub products: Vec<Product>,
    pub services: BTreeMap<String, Vec<Service>>,
    pub versions: ServiceKeyed<Vec<ApiVersion>>,
    #[serde(default)]
    pub release_notes: VersionKeyed<ReleaseNote>,
    #[serde(default)]
    pub api_specs: VersionKeyed<ApiSpecs>,
    #[serde(default)]
    pub info_cards: Vec<InfoCard>,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub manifest: Manifest,
}

enum Section {
    Products,
    Services,
    Versions,
}

impl ProjectData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn product_mut(&mut self, product_id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == product_id)
    }

    pub fn services_for(&self, product_id: &str) -> &[Service] {
        self.services
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn service(&self, product_id: &str, service_id: &str) -> Option<&Service> {
        self.services_for(product_id)
            .iter()
            .find(|s| s.id == service_id)
    }

    pub fn versions_for(&self, product_id: &str, service_id: &str) -> &[ApiVersion] {
        self.versions
            .get(product_id)
            .and_then(|by_service| by_service.get(service_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn version(&self, product_id: &str, service_id: &str, version: &str) -> Option<&ApiVersion> {
        self.versions_for(product_id, service_id)
            .iter()
            .find(|v| v.version == version)
    }

    pub fn release_note(
        &self,
        product_id: &str,
        service_id: &str,
        version: &str,
    ) -> Option<&ReleaseNote> {
        lookup(&self.release_notes, product_id, service_id, version)
    }

    pub fn example_set(
        &self,
        product_id: &str,
        service_id: &str,
        version: &str,
    ) -> Option<&ExampleSet> {
        lookup(&self.assets.examples, product_id, service_id, version)
    }

    /// Specs of a version: its own slots, or the project-level index entry when
    /// the version carries none.
    pub fn api_specs_for(
        &self,
        product_id: &str,
        service_id: &str,
        version: &str,
    ) -> Option<&ApiSpecs> {
        match self.version(product_id, service_id, version) {
            Some(v) if !v.api_specs.is_empty() => Some(&v.api_specs),
            _ => lookup(&self.api_specs, product_id, service_id, version),
        }
    }

    pub fn service_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn version_count(&self) -> usize {
        self.versions
            .values()
            .flat_map(|by_service| by_service.values())
            .map(Vec::len)
            .sum()
    }

    fn release_note_count(&self) -> usize {
        self.release_notes
            .values()
            .flat_map(|by_service| by_service.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// Counts derived from the containment maps.
    pub fn counts(&self) -> ManifestCounts {
        ManifestCounts {
            products: self.products.len(),
            services: self.service_count(),
            versions: self.version_count(),
            release_notes: self.release_note_count(),
            info_cards: self.info_cards.len(),
        }
    }

    /// Recompute the manifest counts.
    pub fn recount(&mut self) {
        self.manifest.counts = self.counts();
    }

    fn touch(&mut self, section: Section) {
        let now = Utc::now();
        match section {
            Section::Products => self.manifest.last_updated.products = now,
            Section::Services => self.manifest.last_updated.services = now,
            Section::Versions => self.manifest.last_updated.versions = now,
        }
        self.recount();
    }

    pub fn add_product(&mut self, product: Product) -> Result<(), ModelError> {
        validate_slug("product", &product.id)?;
        if self.product(&product.id).is_some() {
            return Err(ModelError::Duplicate {
                entity_type: "product",
                entity_id: product.id,
            });
        }
        info!("Adding product {}", product.id);
        self.products.push(product);
        self.touch(Section::Products);
        Ok(())
    }

    /// Replace a product in place. The id is the lookup key and cannot change.
    pub fn update_product(&mut self, product: Product) -> Result<(), ModelError> {
        let existing = self
            .product_mut(&product.id)
            .ok_or_else(|| not_found("product", &product.id))?;
        *existing = product;
        self.touch(Section::Products);
        Ok(())
    }

    /// Delete a product together with everything it owns.
    pub fn delete_product(&mut self, product_id: &str) -> Result<Product, ModelError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| not_found("product", product_id))?;
        let product = self.products.remove(index);

        let services = self.services.remove(product_id).map_or(0, |s| s.len());
        self.versions.remove(product_id);
        self.purge_owned(product_id, None, None);

        info!(
            "Deleted product {} with {} services",
            product_id, services
        );
        self.touch(Section::Products);
        Ok(product)
    }

    pub fn add_service(&mut self, service: Service) -> Result<(), ModelError> {
        validate_slug("service", &service.id)?;
        if self.product(&service.product_id).is_none() {
            return Err(not_found("product", &service.product_id));
        }
        if self.service(&service.product_id, &service.id).is_some() {
            return Err(ModelError::Duplicate {
                entity_type: "service",
                entity_id: format!("{}/{}", service.product_id, service.id),
            });
        }
        info!("Adding service {}/{}", service.product_id, service.id);
        self.services
            .entry(service.product_id.clone())
            .or_default()
            .push(service);
        self.touch(Section::Services);
        Ok(())
    }

    /// Replace a service in place and re-stamp its versions with its protocol.
    pub fn update_service(&mut self, service: Service) -> Result<(), ModelError> {
        let existing = self
            .services
            .get_mut(&service.product_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == service.id))
            .ok_or_else(|| not_found("service", &format!("{}/{}", service.product_id, service.id)))?;
        let protocol = service.protocol_type;
        let product_id = service.product_id.clone();
        let service_id = service.id.clone();
        *existing = service;

        if let Some(versions) = self
            .versions
            .get_mut(&product_id)
            .and_then(|by_service| by_service.get_mut(&service_id))
        {
            for version in versions.iter_mut() {
                version.protocol_type = Some(protocol);
            }
        }
        self.touch(Section::Services);
        Ok(())
    }

    /// Delete a service with its versions, specs, release notes and examples.
    pub fn delete_service(
        &mut self,
        product_id: &str,
        service_id: &str,
    ) -> Result<Service, ModelError> {
        let list = self
            .services
            .get_mut(product_id)
            .ok_or_else(|| not_found("service", &format!("{product_id}/{service_id}")))?;
        let index = list
            .iter()
            .position(|s| s.id == service_id)
            .ok_or_else(|| not_found("service", &format!("{product_id}/{service_id}")))?;
        let service = list.remove(index);
        if list.is_empty() {
            self.services.remove(product_id);
        }

        if let Some(by_service) = self.versions.get_mut(product_id) {
            by_service.remove(service_id);
            if by_service.is_empty() {
                self.versions.remove(product_id);
            }
        }
        self.purge_owned(product_id, Some(service_id), None);

        info!("Deleted service {}/{}", product_id, service_id);
        self.touch(Section::Services);
        Ok(service)
    }

    /// Insert or replace a version under a service.
    ///
    /// The version is stamped with the service protocol and its specs are
    /// mirrored into the project-level spec index.
    pub fn save_version(
        &mut self,
        product_id: &str,
        service_id: &str,
        mut version: ApiVersion,
    ) -> Result<(), ModelError> {
        validate_version(&version.version)?;
        let protocol = self
            .service(product_id, service_id)
            .map(|s| s.protocol_type)
            .ok_or_else(|| not_found("service", &format!("{product_id}/{service_id}")))?;

        let specs = &version.api_specs;
        let mismatch = match protocol {
            ProtocolType::Rest => specs.openapi.is_none() && specs.mqtt.is_some(),
            ProtocolType::Mqtt => specs.mqtt.is_none() && specs.openapi.is_some(),
        };
        if mismatch {
            let found = match protocol {
                ProtocolType::Rest => ProtocolType::Mqtt,
                ProtocolType::Mqtt => ProtocolType::Rest,
            };
            return Err(ModelError::ProtocolMismatch {
                service_id: service_id.to_string(),
                version: version.version,
                protocol: protocol.to_string(),
                found: found.to_string(),
            });
        }
        version.protocol_type = Some(protocol);

        let version_id = version.version.clone();
        if version.api_specs.is_empty() {
            purge_scope(&mut self.api_specs, product_id, Some(service_id), Some(&version_id));
        } else {
            self.api_specs
                .entry(product_id.to_string())
                .or_default()
                .entry(service_id.to_string())
                .or_default()
                .insert(version_id.clone(), version.api_specs.clone());
        }

        let versions = self
            .versions
            .entry(product_id.to_string())
            .or_default()
            .entry(service_id.to_string())
            .or_default();
        match versions.iter_mut().find(|v| v.version == version_id) {
            Some(existing) => {
                debug!("Replacing version {}/{}/{}", product_id, service_id, version_id);
                *existing = version;
            }
            None => {
                debug!("Adding version {}/{}/{}", product_id, service_id, version_id);
                versions.push(version);
            }
        }
        self.touch(Section::Versions);
        Ok(())
    }

    /// Delete a version with its spec index entry, release note and examples.
    pub fn delete_version(
        &mut self,
        product_id: &str,
        service_id: &str,
        version: &str,
    ) -> Result<ApiVersion, ModelError> {
        let key = format!("{product_id}/{service_id}/{version}");
        let by_service = self
            .versions
            .get_mut(product_id)
            .ok_or_else(|| not_found("version", &key))?;
        let list = by_service
            .get_mut(service_id)
            .ok_or_else(|| not_found("version", &key))?;
        let index = list
            .iter()
            .position(|v| v.version == version)
            .ok_or_else(|| not_found("version", &key))?;
        let removed = list.remove(index);
        if list.is_empty() {
            by_service.remove(service_id);
        }
        if by_service.is_empty() {
            self.versions.remove(product_id);
        }

        self.purge_owned(product_id, Some(service_id), Some(version));
        info!("Deleted version {}", key);
        self.touch(Section::Versions);
        Ok(removed)
    }

    pub fn set_release_note(&mut self, note: ReleaseNote) -> Result<(), ModelError> {
        if self
            .version(&note.product_id, &note.service_id, &note.version)
            .is_none()
        {
            return Err(not_found(
                "version",
                &format!("{}/{}/{}", note.product_id, note.service_id, note.version),
            ));
        }
        self.release_notes
            .entry(note.product_id.clone())
            .or_default()
            .entry(note.service_id.clone())
            .or_default()
            .insert(note.version.clone(), note);
        self.touch(Section::Versions);
        Ok(())
    }

    pub fn set_examples(
        &mut self,
        product_id: &str,
        service_id: &str,
        version: &str,
        examples: ExampleSet,
    ) -> Result<(), ModelError> {
        if self.version(product_id, service_id, version).is_none() {
            return Err(not_found(
                "version",
                &format!("{product_id}/{service_id}/{version}"),
            ));
        }
        self.assets
            .examples
            .entry(product_id.to_string())
            .or_default()
            .entry(service_id.to_string())
            .or_default()
            .insert(version.to_string(), examples);
        Ok(())
    }

    pub fn add_info_card(&mut self, card: InfoCard) -> Result<(), ModelError> {
        if self.info_cards.iter().any(|c| c.id == card.id) {
            return Err(ModelError::Duplicate {
                entity_type: "info card",
                entity_id: card.id,
            });
        }
        self.info_cards.push(card);
        self.recount();
        Ok(())
    }

    pub fn remove_info_card(&mut self, card_id: &str) -> Result<InfoCard, ModelError> {
        let index = self
            .info_cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(|| not_found("info card", card_id))?;
        let card = self.info_cards.remove(index);
        self.recount();
        Ok(card)
    }

    /// Remove every triple-keyed entry owned by the given scope.
    fn purge_owned(&mut self, product_id: &str, service_id: Option<&str>, version: Option<&str>) {
        purge_scope(&mut self.release_notes, product_id, service_id, version);
        purge_scope(&mut self.api_specs, product_id, service_id, version);
        purge_scope(&mut self.assets.examples, product_id, service_id, version);
    }
}

fn lookup<'a, T>(
    map: &'a VersionKeyed<T>,
    product_id: &str,
    service_id: &str,
    version: &str,
) -> Option<&'a T> {
    map.get(product_id)
        .and_then(|by_service| by_service.get(service_id))
        .and_then(|by_version| by_version.get(version))
}

fn purge_scope<T>(
    map: &mut VersionKeyed<T>,
    product_id: &str,
    service_id: Option<&str>,
    version: Option<&str>,
) {
    let Some(service_id) = service_id else {
        map.remove(product_id);
        return;
    };
    let Some(by_service) = map.get_mut(product_id) else {
        return;
    };
    match version {
        None => {
            by_service.remove(service_id);
        }
        Some(version) => {
            if let Some(by_version) = by_service.get_mut(service_id) {
                by_version.remove(version);
                if by_version.is_empty() {
                    by_service.remove(service_id);
                }
            }
        }
    }
    if by_service.is_empty() {
        map.remove(product_id);
    }
}

fn not_found(entity_type: &'static str, entity_id: &str) -> ModelError {
    ModelError::NotFound {
        entity_type,
        entity_id: entity_id.to_string(),
    }
}

fn validate_slug(entity_type: &'static str, id: &str) -> Result<(), ModelError> {
    if SLUG_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(ModelError::InvalidId {
            entity_type,
            entity_id: id.to_string(),
        })
    }
}

fn validate_version(version: &str) -> Result<(), ModelError> {
    if VERSION_PATTERN.is_match(version) && !version.contains("..") {
        Ok(())
    } else {
        Err(ModelError::InvalidId {
            entity_type: "version",
            entity_id: version.to_string(),
        })
    }
}
