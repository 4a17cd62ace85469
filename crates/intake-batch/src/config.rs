use std::path::Path;

use intake_storage::StorageConfig;
use intake_validate::{ValidationConfig, Validator};
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, BatchResult};

/// Top-level intake configuration, usually read from a TOML file.
///
/// ```toml
/// [validation]
/// extensions = ["png", "jpg"]
/// max_size = "3M"
///
/// [storage]
/// directory = "/srv/uploads"
/// overwrite = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

impl IntakeConfig {
    pub fn from_toml_str(text: &str) -> BatchResult<Self> {
        toml::from_str(text).map_err(|e| BatchError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> BatchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> BatchResult<String> {
        toml::to_string(self).map_err(|e| BatchError::Config(e.to_string()))
    }

    /// The validator chain described by `[validation]`.
    pub fn validators(&self) -> BatchResult<Vec<Box<dyn Validator>>> {
        Ok(self.validation.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::SizeLimit;

    #[test]
    fn parses_full_config() {
        let config = IntakeConfig::from_toml_str(
            r#"
            [validation]
            extensions = ["png", "jpg"]
            mimetypes = ["image/png"]
            max_size = "3M"
            min_size = 10

            [storage]
            directory = "/srv/uploads"
            overwrite = true
            "#,
        )
        .unwrap();

        assert_eq!(config.validation.extensions, ["png", "jpg"]);
        assert_eq!(config.validation.max_size, Some(SizeLimit::Human("3M".into())));
        assert_eq!(config.validation.min_size, Some(SizeLimit::Bytes(10)));
        let storage = config.storage.unwrap();
        assert_eq!(storage.directory, std::path::PathBuf::from("/srv/uploads"));
        assert!(storage.overwrite);
    }

    #[test]
    fn empty_config_is_default() {
        let config = IntakeConfig::from_toml_str("").unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert!(config.validators().unwrap().is_empty());
    }

    #[test]
    fn builds_validator_chain() {
        let config = IntakeConfig::from_toml_str(
            "[validation]\nextensions = [\"png\"]\nmax_size = \"1k\"\n",
        )
        .unwrap();
        let names: Vec<String> = config
            .validators()
            .unwrap()
            .iter()
            .map(|v| v.name().to_string())
            .collect();
        assert_eq!(names, ["extension", "size"]);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let config = IntakeConfig::from_toml_str(
            "[validation]\nmax_size = 10\nmin_size = 20\n",
        )
        .unwrap();
        assert!(matches!(config.validators(), Err(BatchError::Validation(_))));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = IntakeConfig::from_toml_str("[validation\n").unwrap_err();
        assert!(matches!(err, BatchError::Config(_)));
    }

    #[test]
    fn load_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.toml");
        let config = IntakeConfig {
            validation: ValidationConfig {
                extensions: vec!["pdf".into()],
                ..Default::default()
            },
            storage: Some(StorageConfig::new("/tmp/out")),
        };
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(IntakeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = IntakeConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }
}
