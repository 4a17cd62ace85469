use serde::{Deserialize, Serialize};

use intake_types::SizeLimit;
use tracing::debug;

use crate::error::{ValidateError, ValidateResult};
use crate::rules::{Extension, Mimetype, Size};
use crate::validator::Validator;

/// Declarative description of a validator chain.
///
/// Absent or empty rules are skipped. The built chain always runs in the
/// order extension, mimetype, size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed extensions (case-insensitive).
    pub extensions: Vec<String>,
    /// Allowed mimetypes (exact match).
    pub mimetypes: Vec<String>,
    /// Maximum size, inclusive.
    pub max_size: Option<SizeLimit>,
    /// Minimum size, inclusive.
    pub min_size: Option<SizeLimit>,
}

impl ValidationConfig {
    /// Returns `true` when no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
            && self.mimetypes.is_empty()
            && self.max_size.is_none()
            && self.min_size.is_none()
    }

    /// Build the validator chain.
    ///
    /// Fails if the minimum size exceeds the maximum.
    pub fn build(&self) -> ValidateResult<Vec<Box<dyn Validator>>> {
        let mut chain: Vec<Box<dyn Validator>> = Vec::new();

        if !self.extensions.is_empty() {
            chain.push(Box::new(Extension::new(&self.extensions)));
        }
        if !self.mimetypes.is_empty() {
            chain.push(Box::new(Mimetype::new(self.mimetypes.iter().cloned())));
        }
        if self.max_size.is_some() || self.min_size.is_some() {
            let max = self
                .max_size
                .as_ref()
                .map_or(u64::MAX, SizeLimit::to_bytes);
            let min = self.min_size.as_ref().map_or(0, SizeLimit::to_bytes);
            if min > max {
                return Err(ValidateError::Config(format!(
                    "min_size ({min}) is greater than max_size ({max})"
                )));
            }
            chain.push(Box::new(Size::new(max).with_min(min)));
        }

        debug!(validators = chain.len(), "built validator chain");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_builds_empty_chain() {
        let config = ValidationConfig::default();
        assert!(config.is_empty());
        assert!(config.build().unwrap().is_empty());
    }

    #[test]
    fn chain_order_is_fixed() {
        let config = ValidationConfig {
            extensions: vec!["png".into()],
            mimetypes: vec!["image/png".into()],
            max_size: Some("2M".into()),
            min_size: None,
        };
        let chain = config.build().unwrap();
        let names: Vec<&str> = chain.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["extension", "mimetype", "size"]);
    }

    #[test]
    fn min_without_max_is_open_ended() {
        let config = ValidationConfig {
            min_size: Some(SizeLimit::Bytes(1)),
            ..Default::default()
        };
        assert_eq!(config.build().unwrap().len(), 1);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = ValidationConfig {
            max_size: Some("1K".into()),
            min_size: Some("2K".into()),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(ValidateError::Config(_))));
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"extensions": ["jpg", "png"], "max_size": "5M", "min_size": 1}"#;
        let config: ValidationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extensions, ["jpg", "png"]);
        assert_eq!(config.max_size.unwrap().to_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.min_size.unwrap().to_bytes(), 1);
        assert!(config.mimetypes.is_empty());
    }
}
