//! Search index generator.
//!
//! Flattens the content tree into one entry per product, service and API
//! version, in stored order, for a client-side search box.

use crate::models::{ProjectData, Service};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchItemType {
    Product,
    Service,
    Api,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: SearchItemType,
    pub link: String,
    pub parent_id: Option<String>,
    pub content: String,
    pub priority: u8,
}

/// Wrapper written to `search-index.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub index_items: Vec<SearchIndexItem>,
}

impl SearchIndex {
    pub fn count(&self, item_type: SearchItemType) -> usize {
        self.index_items
            .iter()
            .filter(|item| item.item_type == item_type)
            .count()
    }
}

/// Exporter for the search index.
pub struct SearchIndexExporter;

impl SearchIndexExporter {
    pub fn export_project(project: &ProjectData) -> SearchIndex {
        let mut index_items = Vec::new();

        for product in &project.products {
            let product_entry = format!("product_{}", product.id);
            let mut product_content = vec![
                product.overview.clone().unwrap_or_default(),
                product.key_features.join(" "),
            ];
            product_content.retain(|part| !part.is_empty());
            index_items.push(SearchIndexItem {
                id: product_entry.clone(),
                title: format!("{} - {}", product.label(), product.short_description),
                item_type: SearchItemType::Product,
                link: format!("/{}", product.id),
                parent_id: None,
                content: product_content.join(" "),
                priority: 1,
            });

            for service in project.services_for(&product.id) {
                let service_entry = format!("service_{}_{}", product.id, service.id);
                index_items.push(Self::service_item(
                    &product.id,
                    service,
                    &service_entry,
                    &product_entry,
                ));

                for version in project.versions_for(&product.id, &service.id) {
                    index_items.push(SearchIndexItem {
                        id: format!("api_{}_{}_{}", product.id, service.id, version.version),
                        title: format!("{} v{}", service.label(), version.version),
                        item_type: SearchItemType::Api,
                        link: format!("/{}/{}/{}", product.id, service.id, version.version),
                        parent_id: Some(service_entry.clone()),
                        content: join_text(&[&version.introduction, &version.getting_started]),
                        priority: 3,
                    });
                }
            }
        }

        SearchIndex { index_items }
    }

    fn service_item(
        product_id: &str,
        service: &Service,
        service_entry: &str,
        product_entry: &str,
    ) -> SearchIndexItem {
        SearchIndexItem {
            id: service_entry.to_string(),
            title: format!("{} - {}", service.label(), service.short_description),
            item_type: SearchItemType::Service,
            link: format!("/{}/{}", product_id, service.id),
            parent_id: Some(product_entry.to_string()),
            content: join_text(&[&service.overview, &service.integration_guide]),
            priority: 2,
        }
    }
}

fn join_text(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.as_deref())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
