//! Integration tests for the static bundle layout and its ZIP packaging.

use api_docs_exporter::config::ExportConfig;
use api_docs_exporter::error::ExportError;
use api_docs_exporter::export::bundle::DEFAULT_SERVICE_ICON_SVG;
use api_docs_exporter::export::{ArchiveError, ArchiveWriter, BundleExporter, SnapshotExporter};
use api_docs_exporter::imaging::{ImageCodec, RasterCodec, RasterFormat};
use api_docs_exporter::models::{
    ApiSpecContent, ApiVersion, EmbeddedImage, ExampleSet, InfoCard, Product, ProjectData,
    ProtocolType, ReleaseNote, Service,
};
use chrono::{TimeZone, Utc};
use image::{DynamicImage, Rgb, RgbImage};
use serde_json::json;
use std::io::{Cursor, Read};

const BROKEN_PNG: &str = "data:image/png;base64,@@@not-base64@@@";

fn noise_png(width: u32, height: u32, seed: u32) -> EmbeddedImage {
    let mut state = seed;
    let image = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    });
    let bytes = RasterCodec
        .encode(&DynamicImage::ImageRgb8(image), RasterFormat::Png, 100)
        .unwrap();
    EmbeddedImage::from_bytes("image/png", &bytes)
}

fn create_test_project() -> ProjectData {
    let mut project = ProjectData::new();

    let mut product = Product::new("smart-home".to_string(), "Smart Home".to_string());
    product.icon = Some(EmbeddedImage::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xD9]));
    product.hero_image = Some(EmbeddedImage::new(BROKEN_PNG));
    product.gallery_images = vec![
        EmbeddedImage::from_bytes("image/webp", b"RIFF0000WEBP"),
        EmbeddedImage::new(BROKEN_PNG),
        EmbeddedImage::new("https://cdn.example.com/shot.png"),
    ];
    let mut card = InfoCard::new("Tour".to_string(), "Take the tour".to_string(), "/tour".to_string());
    card.id = "tour".to_string();
    card.image = Some(EmbeddedImage::from_bytes("image/png", &[137, 80, 78, 71]));
    product.info_cards.push(card);
    project.add_product(product).unwrap();

    let mut devices = Service::new(
        "smart-home".to_string(),
        "devices".to_string(),
        "Devices".to_string(),
        ProtocolType::Rest,
    );
    devices.icon = Some(EmbeddedImage::from_bytes("image/svg+xml", b"<svg/>"));
    project.add_service(devices).unwrap();
    project
        .add_service(Service::new(
            "smart-home".to_string(),
            "events".to_string(),
            "Events".to_string(),
            ProtocolType::Mqtt,
        ))
        .unwrap();

    for v in ["1.0.0", "1.10.0", "1.9.0"] {
        let mut version = ApiVersion::new(v.to_string());
        version.api_specs.openapi = Some(ApiSpecContent::text(format!("openapi: 3.0.0 # {v}\n")));
        project.save_version("smart-home", "devices", version).unwrap();
    }
    let mut mqtt = ApiVersion::new("2.0.0".to_string());
    mqtt.api_specs.mqtt = Some(
        serde_json::from_value(json!({ "data": "asyncapi: 2.6.0\n", "fileName": "events.yaml" }))
            .unwrap(),
    );
    project.save_version("smart-home", "events", mqtt).unwrap();

    project
        .set_release_note(ReleaseNote {
            product_id: "smart-home".to_string(),
            service_id: "devices".to_string(),
            version: "1.0.0".to_string(),
            summary: "Initial release".to_string(),
            ..Default::default()
        })
        .unwrap();
    project
        .set_examples(
            "smart-home",
            "devices",
            "1.0.0",
            ExampleSet {
                requests: Some(json!({ "list": { "method": "GET" } })),
                responses: None,
            },
        )
        .unwrap();

    let mut landing = InfoCard::new("News".to_string(), "What's new".to_string(), "/news".to_string());
    landing.id = "news".to_string();
    landing.image = Some(EmbeddedImage::from_bytes("image/gif", b"GIF89a"));
    project.add_info_card(landing).unwrap();

    project
}

fn generated_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_bundle_layout() {
    let exporter = BundleExporter::new(ExportConfig::default());
    let project = create_test_project();

    let bundle = exporter
        .build_static_bundle(&project, generated_at())
        .await
        .unwrap();

    for path in [
        "manifest.json",
        "products.json",
        "info-cards.json",
        "search-index.json",
        "products/smart-home.json",
        "services/smart-home/devices.json",
        "services/smart-home/events.json",
        "versions/smart-home/devices/1.0.0.json",
        "versions/smart-home/events/2.0.0.json",
        "release-notes/smart-home/devices/1.0.0.json",
        "api-specs/smart-home/devices/1.0.0/openapi.yaml",
        "api-specs/smart-home/events/2.0.0/asyncapi.yaml",
        "assets/examples/smart-home/devices/1.0.0/requests.json",
        "assets/images/global/default-service-icon.svg",
        "assets/images/products/smart-home/product-icon.jpg",
        "assets/images/products/smart-home/gallery/image1.webp",
        "assets/images/products/smart-home/info-cards/tour.png",
        "assets/images/services/smart-home/devices/service-icon.svg",
        "assets/images/info-cards/news.gif",
    ] {
        assert!(bundle.contains(path), "missing {}", path);
    }
    assert!(!bundle.contains("assets/examples/smart-home/devices/1.0.0/responses.json"));
    assert!(!bundle.contains("release-notes/smart-home/devices/1.9.0.json"));
    assert_eq!(
        bundle.text("assets/images/global/default-service-icon.svg"),
        Some(DEFAULT_SERVICE_ICON_SVG)
    );
    assert_eq!(
        bundle.get("assets/images/products/smart-home/product-icon.jpg"),
        Some(&[0xFF, 0xD8, 0xFF, 0xD9][..])
    );
}

#[tokio::test]
async fn test_manifest_and_product_documents() {
    let exporter = BundleExporter::new(ExportConfig::default());
    let project = create_test_project();

    let bundle = exporter
        .build_static_bundle(&project, generated_at())
        .await
        .unwrap();

    let manifest = bundle.json("manifest.json").unwrap();
    assert_eq!(manifest["counts"]["products"], 1);
    assert_eq!(manifest["counts"]["services"], 2);
    assert_eq!(manifest["counts"]["versions"], 4);
    assert_eq!(manifest["counts"]["release_notes"], 1);
    assert_eq!(manifest["counts"]["info_cards"], 1);
    assert_eq!(manifest["generated_at"], "2024-05-01T12:00:00Z");

    let products = bundle.json("products.json").unwrap();
    assert_eq!(products[0]["id"], "smart-home");
    assert_eq!(products[0]["services_count"], 2);
    assert!(products[0].get("services").is_none());

    let product = bundle.json("products/smart-home.json").unwrap();
    assert_eq!(
        product["icon"],
        "assets/images/products/smart-home/product-icon.jpg"
    );
    assert!(product["hero_image"].is_null());
    assert_eq!(
        product["gallery_images"],
        json!([
            "assets/images/products/smart-home/gallery/image1.webp",
            "https://cdn.example.com/shot.png"
        ])
    );
    assert_eq!(
        product["info_cards"][0]["image"],
        "assets/images/products/smart-home/info-cards/tour.png"
    );
    assert_eq!(product["services"][0]["id"], "devices");
    assert_eq!(product["services"][0]["versions_count"], 3);
    assert_eq!(product["services"][0]["latest_version"], "1.10.0");
    assert_eq!(product["services"][1]["protocol_type"], "MQTT");
}

#[tokio::test]
async fn test_service_and_version_documents() {
    let exporter = BundleExporter::new(ExportConfig::default());
    let project = create_test_project();

    let bundle = exporter
        .build_static_bundle(&project, generated_at())
        .await
        .unwrap();

    let devices = bundle.json("services/smart-home/devices.json").unwrap();
    assert_eq!(
        devices["icon"],
        "assets/images/services/smart-home/devices/service-icon.svg"
    );
    assert_eq!(devices["product_id"], "smart-home");
    assert_eq!(devices["versions"].as_array().unwrap().len(), 3);
    let events = bundle.json("services/smart-home/events.json").unwrap();
    assert_eq!(events["icon"], "assets/images/global/default-service-icon.svg");

    let version = bundle.json("versions/smart-home/devices/1.0.0.json").unwrap();
    assert_eq!(
        version["api_specs"]["openapi"],
        "api-specs/smart-home/devices/1.0.0/openapi.yaml"
    );
    assert!(version["api_specs"].get("mqtt").is_none());
    let events_version = bundle.json("versions/smart-home/events/2.0.0.json").unwrap();
    assert_eq!(
        events_version["api_specs"],
        json!({ "mqtt": "api-specs/smart-home/events/2.0.0/asyncapi.yaml" })
    );
    assert_eq!(version["product_id"], "smart-home");
    assert_eq!(version["service_id"], "devices");
    assert_eq!(
        version["release_notes_url"],
        "release-notes/smart-home/devices/1.0.0.json"
    );
    assert_eq!(
        version["examples_url"],
        "assets/examples/smart-home/devices/1.0.0/"
    );

    assert_eq!(
        bundle.text("api-specs/smart-home/devices/1.0.0/openapi.yaml"),
        Some("openapi: 3.0.0 # 1.0.0\n")
    );
    assert_eq!(
        bundle.text("api-specs/smart-home/events/2.0.0/asyncapi.yaml"),
        Some("asyncapi: 2.6.0\n")
    );
    assert_eq!(
        bundle.json("assets/examples/smart-home/devices/1.0.0/requests.json"),
        Some(json!({ "list": { "method": "GET" } }))
    );
}

#[tokio::test]
async fn test_single_rest_service_has_only_openapi() {
    let mut project = ProjectData::new();
    project
        .add_product(Product::new("billing".to_string(), "Billing".to_string()))
        .unwrap();
    project
        .add_service(Service::new(
            "billing".to_string(),
            "invoices".to_string(),
            "Invoices".to_string(),
            ProtocolType::Rest,
        ))
        .unwrap();
    let mut version = ApiVersion::new("1.0.0".to_string());
    version.api_specs.openapi = Some(ApiSpecContent::text("openapi: 3.0.0\n"));
    project.save_version("billing", "invoices", version).unwrap();
    let exporter = BundleExporter::new(ExportConfig::default());

    let bundle = exporter
        .build_static_bundle(&project, generated_at())
        .await
        .unwrap();

    let specs: Vec<&str> = bundle.paths().filter(|p| p.starts_with("api-specs/")).collect();
    assert_eq!(specs, vec!["api-specs/billing/invoices/1.0.0/openapi.yaml"]);
    assert!(!bundle.contains("release-notes/billing/invoices/1.0.0.json"));
    let index = bundle.json("search-index.json").unwrap();
    assert_eq!(index["indexItems"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_gallery_export_is_stable_after_reload() {
    let mut project = ProjectData::new();
    let mut product = Product::new("smart-home".to_string(), "Smart Home".to_string());
    product.gallery_images = vec![
        noise_png(320, 240, 1),
        noise_png(320, 240, 2),
        noise_png(320, 240, 3),
        noise_png(300, 300, 4),
        noise_png(16, 16, 5),
    ];
    project.add_product(product).unwrap();
    let exporter = BundleExporter::new(ExportConfig::default());

    let saved = exporter.export_snapshot(&project).await.unwrap();
    let reloaded =
        SnapshotExporter::import_project(std::str::from_utf8(&saved.bytes).unwrap()).unwrap();
    let first = exporter
        .build_static_bundle(&project, generated_at())
        .await
        .unwrap();
    let second = exporter
        .build_static_bundle(&reloaded, generated_at())
        .await
        .unwrap();

    let gallery: Vec<&str> = first.paths().filter(|p| p.contains("/gallery/")).collect();
    assert_eq!(gallery.len(), 5);
    for path in gallery {
        assert_eq!(first.get(path), second.get(path), "{}", path);
    }
}

#[tokio::test]
async fn test_zip_archive_under_root_folder() {
    let exporter = BundleExporter::new(ExportConfig::default());
    let project = create_test_project();

    let file = exporter.export_static_bundle(&project).await.unwrap();

    assert!(file.file_name.starts_with("api-docs-static-"));
    assert!(file.file_name.ends_with(".zip"));
    assert_eq!(file.media_type, "application/zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(file.bytes)).unwrap();
    assert!(archive.file_names().all(|name| name.starts_with("data/")));
    assert!(archive.by_name("data/products/").is_ok());

    let mut manifest = String::new();
    archive
        .by_name("data/manifest.json")
        .unwrap()
        .read_to_string(&mut manifest)
        .unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["counts"]["products"], 1);

    let entry = archive
        .by_name("data/api-specs/smart-home/devices/1.0.0/openapi.yaml")
        .unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
}

#[tokio::test]
async fn test_zip_archive_without_root_folder() {
    let config = ExportConfig {
        root_folder: String::new(),
        ..Default::default()
    };
    let exporter = BundleExporter::new(config);

    let file = exporter
        .export_static_bundle(&create_test_project())
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(file.bytes)).unwrap();
    assert!(archive.by_name("manifest.json").is_ok());
}

struct FailingWriter {
    files: usize,
}

impl ArchiveWriter for FailingWriter {
    fn add_directory(&mut self, _path: &str) -> Result<(), ArchiveError> {
        Ok(())
    }

    fn add_file(&mut self, _path: &str, _contents: &[u8]) -> Result<(), ArchiveError> {
        self.files += 1;
        if self.files > 3 {
            return Err(ArchiveError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_packaging_failure_aborts_export() {
    let exporter = BundleExporter::new(ExportConfig::default());

    let result = exporter
        .export_static_bundle_with(&create_test_project(), FailingWriter { files: 0 })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ExportError::Archive(_)));
    assert!(err.to_string().starts_with("Failed to export"));
}
