#[cfg(test)]
mod tests {
    use api_docs_exporter::error::ModelError;
    use api_docs_exporter::models::{
        ApiSpecContent, ApiVersion, ExampleSet, InfoCard, Product, ProductCategory,
        ProductStatus, ProjectData, ProtocolType, ReleaseNote, Service, latest_version,
    };
    use serde_json::json;

    fn rest_version(version: &str) -> ApiVersion {
        let mut v = ApiVersion::new(version.to_string());
        v.api_specs.openapi = Some(ApiSpecContent::text("openapi: 3.0.0\n"));
        v
    }

    fn release_note(version: &str) -> ReleaseNote {
        ReleaseNote {
            product_id: "smart-home".to_string(),
            service_id: "devices".to_string(),
            version: version.to_string(),
            summary: "First release".to_string(),
            ..Default::default()
        }
    }

    fn create_test_project() -> ProjectData {
        let mut project = ProjectData::new();
        project
            .add_product(Product::new("smart-home".to_string(), "Smart Home".to_string()))
            .unwrap();
        project
            .add_service(Service::new(
                "smart-home".to_string(),
                "devices".to_string(),
                "Devices".to_string(),
                ProtocolType::Rest,
            ))
            .unwrap();
        project
            .save_version("smart-home", "devices", rest_version("1.0.0"))
            .unwrap();
        project.set_release_note(release_note("1.0.0")).unwrap();
        project
            .set_examples(
                "smart-home",
                "devices",
                "1.0.0",
                ExampleSet {
                    requests: Some(json!([{ "method": "GET", "path": "/devices" }])),
                    responses: None,
                },
            )
            .unwrap();
        project
    }

    #[test]
    fn test_project_creation_counts() {
        let project = create_test_project();

        assert_eq!(project.products.len(), 1);
        assert_eq!(project.service_count(), 1);
        assert_eq!(project.version_count(), 1);
        assert_eq!(project.manifest.counts.products, 1);
        assert_eq!(project.manifest.counts.services, 1);
        assert_eq!(project.manifest.counts.versions, 1);
        assert_eq!(project.manifest.counts.release_notes, 1);
    }

    #[test]
    fn test_delete_product_cascades() {
        let mut project = create_test_project();

        let removed = project.delete_product("smart-home").unwrap();
        assert_eq!(removed.id, "smart-home");

        assert!(project.products.is_empty());
        assert!(project.services.is_empty());
        assert!(project.versions.is_empty());
        assert!(project.release_notes.is_empty());
        assert!(project.api_specs.is_empty());
        assert!(project.assets.examples.is_empty());
        assert_eq!(project.manifest.counts.services, 0);
        assert_eq!(project.manifest.counts.versions, 0);
        assert_eq!(project.manifest.counts.release_notes, 0);
    }

    #[test]
    fn test_delete_service_keeps_siblings() {
        let mut project = create_test_project();
        project
            .add_service(Service::new(
                "smart-home".to_string(),
                "telemetry".to_string(),
                "Telemetry".to_string(),
                ProtocolType::Mqtt,
            ))
            .unwrap();

        project.delete_service("smart-home", "devices").unwrap();

        assert!(project.service("smart-home", "devices").is_none());
        assert!(project.service("smart-home", "telemetry").is_some());
        assert!(project.versions_for("smart-home", "devices").is_empty());
        assert!(project.release_note("smart-home", "devices", "1.0.0").is_none());
        assert!(project.example_set("smart-home", "devices", "1.0.0").is_none());
        assert_eq!(project.manifest.counts.services, 1);
    }

    #[test]
    fn test_delete_version_removes_owned_entries() {
        let mut project = create_test_project();
        project
            .save_version("smart-home", "devices", rest_version("1.1.0"))
            .unwrap();

        project.delete_version("smart-home", "devices", "1.0.0").unwrap();

        assert!(project.version("smart-home", "devices", "1.0.0").is_none());
        assert!(project.version("smart-home", "devices", "1.1.0").is_some());
        assert!(project.release_note("smart-home", "devices", "1.0.0").is_none());
        assert!(project.api_specs_for("smart-home", "devices", "1.0.0").is_none());
        assert!(project.api_specs_for("smart-home", "devices", "1.1.0").is_some());
    }

    #[test]
    fn test_delete_missing_entities() {
        let mut project = create_test_project();

        assert!(matches!(
            project.delete_product("unknown"),
            Err(ModelError::NotFound { entity_type: "product", .. })
        ));
        assert!(matches!(
            project.delete_service("smart-home", "unknown"),
            Err(ModelError::NotFound { entity_type: "service", .. })
        ));
        assert!(matches!(
            project.delete_version("smart-home", "devices", "9.9.9"),
            Err(ModelError::NotFound { entity_type: "version", .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut project = create_test_project();

        let err = project
            .add_product(Product::new("smart-home".to_string(), "Again".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::Duplicate {
                entity_type: "product",
                entity_id: "smart-home".to_string(),
            }
        );

        let err = project
            .add_service(Service::new(
                "smart-home".to_string(),
                "devices".to_string(),
                "Devices".to_string(),
                ProtocolType::Rest,
            ))
            .unwrap_err();
        assert!(matches!(err, ModelError::Duplicate { entity_type: "service", .. }));
    }

    #[test]
    fn test_service_ids_scoped_to_product() {
        let mut project = create_test_project();
        project
            .add_product(Product::new("industry".to_string(), "Industry".to_string()))
            .unwrap();

        let result = project.add_service(Service::new(
            "industry".to_string(),
            "devices".to_string(),
            "Devices".to_string(),
            ProtocolType::Rest,
        ));

        assert!(result.is_ok());
        assert_eq!(project.service_count(), 2);
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let mut project = ProjectData::new();

        let err = project
            .add_product(Product::new("Smart Home".to_string(), "Smart Home".to_string()))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidId { entity_type: "product", .. }));

        let err = project
            .add_service(Service::new(
                "missing".to_string(),
                "devices".to_string(),
                "Devices".to_string(),
                ProtocolType::Rest,
            ))
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound { entity_type: "product", .. }));
    }

    #[test]
    fn test_save_version_stamps_protocol() {
        let project = create_test_project();

        let version = project.version("smart-home", "devices", "1.0.0").unwrap();
        assert_eq!(version.protocol_type, Some(ProtocolType::Rest));
        assert!(project.api_specs.contains_key("smart-home"));
    }

    #[test]
    fn test_save_version_protocol_mismatch() {
        let mut project = create_test_project();
        project
            .add_service(Service::new(
                "smart-home".to_string(),
                "telemetry".to_string(),
                "Telemetry".to_string(),
                ProtocolType::Mqtt,
            ))
            .unwrap();

        let err = project
            .save_version("smart-home", "telemetry", rest_version("1.0.0"))
            .unwrap_err();

        assert!(matches!(err, ModelError::ProtocolMismatch { .. }));
        assert!(project.versions_for("smart-home", "telemetry").is_empty());
    }

    #[test]
    fn test_save_version_replaces_existing() {
        let mut project = create_test_project();
        let mut updated = rest_version("1.0.0");
        updated.introduction = Some("Updated".to_string());

        project.save_version("smart-home", "devices", updated).unwrap();

        let versions = project.versions_for("smart-home", "devices");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].introduction.as_deref(), Some("Updated"));
    }

    #[test]
    fn test_update_service_restamps_versions() {
        let mut project = create_test_project();
        let mut service = project.service("smart-home", "devices").unwrap().clone();
        service.protocol_type = ProtocolType::Mqtt;
        service.display_name = "Device API".to_string();

        project.update_service(service).unwrap();

        assert_eq!(project.service("smart-home", "devices").unwrap().label(), "Device API");
        let version = project.version("smart-home", "devices", "1.0.0").unwrap();
        assert_eq!(version.protocol_type, Some(ProtocolType::Mqtt));
    }

    #[test]
    fn test_release_note_requires_version() {
        let mut project = create_test_project();

        let err = project.set_release_note(release_note("2.0.0")).unwrap_err();

        assert!(matches!(err, ModelError::NotFound { entity_type: "version", .. }));
    }

    #[test]
    fn test_info_cards_counted() {
        let mut project = ProjectData::new();
        let card = InfoCard::new(
            "Getting started".to_string(),
            "Read the guide".to_string(),
            "/guide".to_string(),
        );
        let card_id = card.id.clone();

        project.add_info_card(card.clone()).unwrap();
        assert_eq!(project.manifest.counts.info_cards, 1);
        assert!(project.add_info_card(card).is_err());

        project.remove_info_card(&card_id).unwrap();
        assert_eq!(project.manifest.counts.info_cards, 0);
    }

    #[test]
    fn test_api_specs_fall_back_to_project_index() {
        let mut project = create_test_project();
        let mut version = ApiVersion::new("2.0.0".to_string());
        version.protocol_type = Some(ProtocolType::Rest);
        project
            .versions
            .get_mut("smart-home")
            .unwrap()
            .get_mut("devices")
            .unwrap()
            .push(version);
        project
            .api_specs
            .get_mut("smart-home")
            .unwrap()
            .get_mut("devices")
            .unwrap()
            .insert(
                "2.0.0".to_string(),
                api_docs_exporter::models::ApiSpecs {
                    openapi: Some(ApiSpecContent::text("openapi: 3.1.0\n")),
                    mqtt: None,
                },
            );

        let specs = project.api_specs_for("smart-home", "devices", "2.0.0").unwrap();
        assert_eq!(specs.openapi.as_ref().unwrap().raw_text(), "openapi: 3.1.0\n");
    }

    #[test]
    fn test_latest_version_uses_numeric_order() {
        let mut project = create_test_project();
        for v in ["1.2.0", "1.10.0", "v1.9.5"] {
            project
                .save_version("smart-home", "devices", rest_version(v))
                .unwrap();
        }

        let latest = latest_version(project.versions_for("smart-home", "devices")).unwrap();
        assert_eq!(latest.version, "1.10.0");
    }

    #[test]
    fn test_unrecognized_enum_values_kept_verbatim() {
        let product: Product = serde_json::from_value(json!({
            "id": "smart-home",
            "name": "Smart Home",
            "category": "iot",
            "status": "coming_soon"
        }))
        .unwrap();

        assert_eq!(product.category, ProductCategory::Custom("iot".to_string()));
        assert_eq!(product.status, ProductStatus::ComingSoon);
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["category"], "iot");
        assert_eq!(value["status"], "coming_soon");
        assert!(product.extra.is_empty());
    }
}
