use std::path::PathBuf;

use intake_types::FileDescriptor;

use crate::error::StorageResult;

/// Where a file ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Safe name with extension the file was stored under.
    pub name: String,
    /// Final location (a path on disk, or the key for in-memory backends).
    pub location: PathBuf,
}

/// Final placement of validated files.
///
/// All implementations must satisfy these invariants:
/// - The file is stored under its safe name with extension.
/// - An existing file is never replaced unless the backend allows it.
/// - Upload-origin files are moved only through their upload transport.
/// - Failures identify the file they happened on.
///
/// Implementations must be safe to call from independent batches running
/// concurrently; collisions between them resolve as last writer wins.
pub trait StorageBackend: Send + Sync {
    /// Store one file and report where it went.
    fn store(&self, file: &FileDescriptor) -> StorageResult<StoredFile>;
}
