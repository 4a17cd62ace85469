//! The upload transport: the mechanism that received the bytes and staged
//! them at temporary locations.
//!
//! The transport is injected into intake and storage instead of being read
//! from ambient global state, so batches can be driven deterministically.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::record::RawUpload;

/// Source of upload records and oracle for upload provenance.
pub trait UploadTransport: Send + Sync {
    /// The raw record submitted under a form field, if any.
    fn record(&self, field: &str) -> Option<RawUpload>;

    /// Whether `path` was genuinely staged by this transport.
    fn is_uploaded_file(&self, path: &Path) -> bool;

    /// Move a staged file to `to`.
    ///
    /// Must refuse (with `PermissionDenied`) any path the transport did not
    /// stage, so a spoofed temp path can never move an arbitrary file.
    fn move_uploaded_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// In-process upload transport backed by explicitly staged records.
///
/// `stage` registers a record under its form field together with the temp
/// paths of its successful items. A moved file is forgotten, so it cannot be
/// moved twice.
#[derive(Default)]
pub struct StagedUploads {
    records: RwLock<HashMap<String, RawUpload>>,
    staged: RwLock<HashSet<PathBuf>>,
}

impl StagedUploads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record` under `field`.
    pub fn stage(&self, field: impl Into<String>, record: RawUpload) {
        let paths = record.staged_paths();
        debug!(count = paths.len(), "staging upload record");
        self.staged.write().expect("lock poisoned").extend(paths);
        self.records
            .write()
            .expect("lock poisoned")
            .insert(field.into(), record);
    }

    /// Number of temp paths still awaiting a move.
    pub fn pending(&self) -> usize {
        self.staged.read().expect("lock poisoned").len()
    }
}

impl UploadTransport for StagedUploads {
    fn record(&self, field: &str) -> Option<RawUpload> {
        self.records.read().expect("lock poisoned").get(field).cloned()
    }

    fn is_uploaded_file(&self, path: &Path) -> bool {
        self.staged.read().expect("lock poisoned").contains(path)
    }

    fn move_uploaded_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut staged = self.staged.write().expect("lock poisoned");
        if !staged.contains(from) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} was not staged by the upload transport", from.display()),
            ));
        }
        fs::rename(from, to)?;
        staged.remove(from);
        Ok(())
    }
}

impl std::fmt::Debug for StagedUploads {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedUploads")
            .field("records", &self.records.read().expect("lock poisoned").len())
            .field("pending", &self.pending())
            .finish()
    }
}
