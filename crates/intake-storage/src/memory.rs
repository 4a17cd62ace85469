use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use intake_types::FileDescriptor;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::traits::{StorageBackend, StoredFile};

/// In-memory, HashMap-based storage backend.
///
/// Intended for tests and dry runs. File contents are copied into memory
/// under their safe name; the source file is left where it is.
pub struct InMemoryStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    overwrite: bool,
}

impl InMemoryStorage {
    /// Create an empty store that refuses to replace existing names.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            overwrite: false,
        }
    }

    /// Allow or refuse replacing an existing name.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }

    /// Contents stored under `name`.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.read().expect("lock poisoned").get(name).cloned()
    }

    /// Sorted list of stored names.
    pub fn names(&self) -> Vec<String> {
        let map = self.files.read().expect("lock poisoned");
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }

    /// Total bytes across all stored files.
    pub fn total_bytes(&self) -> u64 {
        self.files
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryStorage {
    fn store(&self, file: &FileDescriptor) -> StorageResult<StoredFile> {
        if !file.safe_name().is_usable() {
            return Err(StorageError::InvalidName(file.declared_name().to_string()));
        }

        let name = file.name_with_extension();
        let data = fs::read(file.source_path()).map_err(|source| StorageError::ReadFailed {
            name: name.clone(),
            source,
        })?;
        let mut map = self.files.write().expect("lock poisoned");
        if !self.overwrite && map.contains_key(&name) {
            return Err(StorageError::AlreadyExists(name));
        }
        debug!(file = %name, bytes = data.len(), "stored file in memory");
        map.insert(name.clone(), data);

        Ok(StoredFile {
            location: PathBuf::from(&name),
            name,
        })
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("file_count", &self.len())
            .field("overwrite", &self.overwrite)
            .finish()
    }
}
