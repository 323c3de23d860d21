//! Path and file-name conventions of the static bundle.

use chrono::{DateTime, Utc};

pub const DEFAULT_SERVICE_ICON_PATH: &str = "assets/images/global/default-service-icon.svg";

/// File extension for an image media type. Unknown types map to `jpg`.
pub fn extension_for_media_type(media_type: &str) -> &'static str {
    let lowered = media_type.trim().to_ascii_lowercase();
    let subtype = lowered
        .split(';')
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    match subtype {
        "jpeg" | "jpg" => "jpg",
        "png" => "png",
        "svg+xml" => "svg",
        "webp" => "webp",
        "gif" => "gif",
        _ => "jpg",
    }
}

/// Make an identifier safe to use as one path segment.
pub fn segment(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

pub fn product_icon_path(product_id: &str, ext: &str) -> String {
    format!("assets/images/products/{}/product-icon.{ext}", segment(product_id))
}

pub fn hero_image_path(product_id: &str, ext: &str) -> String {
    format!("assets/images/products/{}/hero-image.{ext}", segment(product_id))
}

/// Gallery image path; `position` is 1-based.
pub fn gallery_image_path(product_id: &str, position: usize, ext: &str) -> String {
    format!(
        "assets/images/products/{}/gallery/image{position}.{ext}",
        segment(product_id)
    )
}

pub fn product_info_card_image_path(product_id: &str, card_id: &str, ext: &str) -> String {
    format!(
        "assets/images/products/{}/info-cards/{}.{ext}",
        segment(product_id),
        segment(card_id)
    )
}

pub fn info_card_image_path(card_id: &str, ext: &str) -> String {
    format!("assets/images/info-cards/{}.{ext}", segment(card_id))
}

pub fn service_icon_path(product_id: &str, service_id: &str, ext: &str) -> String {
    format!(
        "assets/images/services/{}/{}/service-icon.{ext}",
        segment(product_id),
        segment(service_id)
    )
}

pub fn product_document_path(product_id: &str) -> String {
    format!("products/{}.json", segment(product_id))
}

pub fn service_document_path(product_id: &str, service_id: &str) -> String {
    format!("services/{}/{}.json", segment(product_id), segment(service_id))
}

fn triple(product_id: &str, service_id: &str, version: &str) -> String {
    format!(
        "{}/{}/{}",
        segment(product_id),
        segment(service_id),
        segment(version)
    )
}

pub fn version_document_path(product_id: &str, service_id: &str, version: &str) -> String {
    format!("versions/{}.json", triple(product_id, service_id, version))
}

pub fn release_note_path(product_id: &str, service_id: &str, version: &str) -> String {
    format!("release-notes/{}.json", triple(product_id, service_id, version))
}

pub fn openapi_spec_path(product_id: &str, service_id: &str, version: &str) -> String {
    format!("api-specs/{}/openapi.yaml", triple(product_id, service_id, version))
}

pub fn asyncapi_spec_path(product_id: &str, service_id: &str, version: &str) -> String {
    format!("api-specs/{}/asyncapi.yaml", triple(product_id, service_id, version))
}

/// Folder holding `requests.json` / `responses.json` of a version.
pub fn examples_dir(product_id: &str, service_id: &str, version: &str) -> String {
    format!("assets/examples/{}/", triple(product_id, service_id, version))
}

pub fn snapshot_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}.json", now.format("%Y-%m-%d"))
}

pub fn bundle_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}.zip", now.format("%Y-%m-%d"))
}
