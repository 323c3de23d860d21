use super::embedded_image::EmbeddedImage;
use super::enums::{ProductCategory, ProductStatus};
use super::info_card::InfoCard;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UseCase {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub icon: Option<EmbeddedImage>,
    #[serde(default)]
    pub hero_image: Option<EmbeddedImage>,
    #[serde(default)]
    pub gallery_images: Vec<EmbeddedImage>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
    #[serde(default)]
    pub info_cards: Vec<InfoCard>,
    #[serde(default)]
    pub sort_order: i32,
    /// Fields this crate does not model, kept for the next save.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: String, name: String) -> Self {
        Self {
            display_name: name.clone(),
            id,
            name,
            short_description: String::new(),
            overview: None,
            category: ProductCategory::default(),
            status: ProductStatus::default(),
            icon: None,
            hero_image: None,
            gallery_images: Vec::new(),
            key_features: Vec::new(),
            use_cases: Vec::new(),
            info_cards: Vec::new(),
            sort_order: 0,
            extra: Map::new(),
        }
    }

    /// Display name, falling back to the plain name when unset.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}
