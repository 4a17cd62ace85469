use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::filesystem::FileSystemStorage;

/// Configuration for a [`FileSystemStorage`] backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Destination directory; must exist and be writable.
    pub directory: PathBuf,
    /// Replace files that already exist at the destination.
    #[serde(default)]
    pub overwrite: bool,
}

impl StorageConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            overwrite: false,
        }
    }

    /// Create the backend, checking the directory.
    pub fn build(&self) -> StorageResult<FileSystemStorage> {
        FileSystemStorage::new(self.directory.clone(), self.overwrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_defaults_to_false() {
        let config: StorageConfig = serde_json::from_str(r#"{"directory": "/srv/uploads"}"#).unwrap();
        assert_eq!(config, StorageConfig::new("/srv/uploads"));
        assert!(!config.overwrite);
    }

    #[test]
    fn build_checks_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig::new(dir.path()).build().unwrap();
        assert_eq!(storage.directory(), dir.path());
        assert!(StorageConfig::new("/no/such/dir").build().is_err());
    }
}
