use std::io;
use std::path::PathBuf;

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The destination directory does not exist.
    #[error("directory does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),

    /// The destination directory exists but cannot be written to.
    #[error("directory is not writable: {}: {source}", .path.display())]
    DirectoryNotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file with the same name is already stored and overwrite is off.
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    /// The safe name derived for the file is empty.
    #[error("file declared as {0:?} has no usable name")]
    InvalidName(String),

    /// The move primitive failed (cross-device, permissions, vanished source).
    #[error("{name} could not be moved to final destination: {source}")]
    MoveFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The file's contents could not be read.
    #[error("{name} could not be read: {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
