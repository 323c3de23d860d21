use super::embedded_image::EmbeddedImage;
use super::enums::DisplayType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Teaser card linking to further content. Lives on the landing page or on a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoCard {
    pub id: String,
    #[serde(default)]
    pub headline_title: String,
    #[serde(default)]
    pub brief_description: String,
    #[serde(default)]
    pub image: Option<EmbeddedImage>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display_type: DisplayType,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl InfoCard {
    pub fn new(headline_title: String, brief_description: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            headline_title,
            brief_description,
            image: None,
            url,
            display_type: DisplayType::default(),
            sort_order: 0,
            extra: Map::new(),
        }
    }
}
