use super::api_spec::ApiSpecs;
use super::enums::{ProtocolType, VersionStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tutorial {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// One released version of a service API.
///
/// Identity is the `(product_id, service_id, version)` triple; the version string
/// is unique within its service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiVersion {
    pub version: String,
    #[serde(default)]
    pub status: VersionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_until: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub beta: bool,
    #[serde(default)]
    pub breaking_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getting_started: Option<String>,
    #[serde(default)]
    pub tutorials: Vec<Tutorial>,
    #[serde(default)]
    pub code_examples: BTreeMap<String, String>,
    #[serde(default)]
    pub api_specs: ApiSpecs,
    /// Stamped from the owning service whenever the version is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_type: Option<ProtocolType>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl ApiVersion {
    pub fn new(version: String) -> Self {
        Self {
            version,
            status: VersionStatus::default(),
            release_date: None,
            supported_until: None,
            deprecated: false,
            beta: false,
            breaking_changes: false,
            introduction: None,
            getting_started: None,
            tutorials: Vec::new(),
            code_examples: BTreeMap::new(),
            api_specs: ApiSpecs::default(),
            protocol_type: None,
            extra: Map::new(),
        }
    }
}

/// Compare two `major.minor.patch`-like version strings part by part.
///
/// Parts are compared numerically; a non-numeric or missing part counts as 0.
/// There is no pre-release or build-metadata handling.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .trim_start_matches(['v', 'V'])
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect()
    };
    let left = parse(a);
    let right = parse(b);
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// The newest version of a list, by [`compare_versions`].
pub fn latest_version(versions: &[ApiVersion]) -> Option<&ApiVersion> {
    versions
        .iter()
        .max_by(|a, b| compare_versions(&a.version, &b.version))
}
