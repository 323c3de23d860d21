#[cfg(test)]
mod tests {
    use api_docs_exporter::config::{
        ENV_COMPRESSION_LEVEL, ENV_CONFIG_FILE, ENV_ROOT_FOLDER, ExportConfig,
    };
    use api_docs_exporter::models::ImageRole;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: env-touching tests are serialized.
        unsafe {
            std::env::remove_var(ENV_CONFIG_FILE);
            std::env::remove_var(ENV_ROOT_FOLDER);
            std::env::remove_var(ENV_COMPRESSION_LEVEL);
        }
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();

        assert_eq!(config.root_folder, "data/");
        assert_eq!(config.root_prefix(), "data/");
        assert_eq!(config.compression_level, 6);
        assert_eq!(config.images.threshold_for(true), 150 * 1024);
        assert_eq!(config.images.threshold_for(false), 80 * 1024);
        assert_eq!(config.images.quality_for(ImageRole::Hero, true), 92);
        assert_eq!(config.images.quality_for(ImageRole::Hero, false), 85);
        assert_eq!(config.images.quality_for(ImageRole::Icon, true), 80);
        assert_eq!(config.images.quality_for(ImageRole::Gallery, false), 70);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
root_folder: site
images:
  hero:
    png_source: 95
    other_source: 90
"#;
        let config = ExportConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.root_prefix(), "site/");
        assert_eq!(config.compression_level, 6);
        assert_eq!(config.images.quality_for(ImageRole::Hero, true), 95);
        assert_eq!(config.images.quality_for(ImageRole::Icon, true), 80);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ExportConfig::from_yaml_str("compression_level: 12").is_err());
        assert!(ExportConfig::from_yaml_str("root_folder: ../outside").is_err());
        assert!(
            ExportConfig::from_yaml_str("images:\n  icon:\n    png_source: 0\n    other_source: 70\n")
                .is_err()
        );
    }

    #[test]
    fn test_empty_root_folder() {
        let config = ExportConfig::from_yaml_str("root_folder: \"\"").unwrap();
        assert_eq!(config.root_prefix(), "");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        // SAFETY: env-touching tests are serialized.
        unsafe {
            std::env::set_var(ENV_ROOT_FOLDER, "public");
            std::env::set_var(ENV_COMPRESSION_LEVEL, "9");
        }

        let config = ExportConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.root_prefix(), "public/");
        assert_eq!(config.compression_level, 9);
    }

    #[test]
    #[serial]
    fn test_env_invalid_level() {
        clear_env();
        // SAFETY: env-touching tests are serialized.
        unsafe {
            std::env::set_var(ENV_COMPRESSION_LEVEL, "fast");
        }

        let result = ExportConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_config_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.yaml");
        std::fs::write(&path, "compression_level: 3\nbundle_file_prefix: docs\n").unwrap();
        // SAFETY: env-touching tests are serialized.
        unsafe {
            std::env::set_var(ENV_CONFIG_FILE, &path);
        }

        let config = ExportConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.compression_level, 3);
        assert_eq!(config.bundle_file_prefix, "docs");
        assert_eq!(config.root_folder, "data/");
    }
}
