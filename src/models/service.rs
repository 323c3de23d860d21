use super::embedded_image::EmbeddedImage;
use super::enums::{ProtocolType, ServiceCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique within the owning product only.
    pub id: String,
    /// Back-reference for breadcrumbs. Ownership is the services-by-product map.
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub category: ServiceCategory,
    #[serde(default)]
    pub protocol_type: ProtocolType,
    #[serde(default)]
    pub icon: Option<EmbeddedImage>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_guide: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    pub fn new(product_id: String, id: String, name: String, protocol_type: ProtocolType) -> Self {
        Self {
            display_name: name.clone(),
            id,
            product_id,
            name,
            short_description: String::new(),
            overview: None,
            category: ServiceCategory::default(),
            protocol_type,
            icon: None,
            key_features: Vec::new(),
            integration_guide: None,
            sort_order: 0,
            extra: Map::new(),
        }
    }

    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}
