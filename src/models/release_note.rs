use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Release note of one API version, keyed by `(product_id, service_id, version)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReleaseNote {
    pub product_id: String,
    pub service_id: String,
    pub version: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub breaking_changes: Vec<String>,
    #[serde(default)]
    pub new_features: Vec<String>,
    #[serde(default)]
    pub bug_fixes: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub known_issues: Vec<String>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}
