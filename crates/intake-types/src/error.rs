use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading or probing a candidate file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read or its metadata could not be queried.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not an image, or its header could not be decoded.
    #[error("cannot read image dimensions of {path}: {reason}")]
    Dimensions { path: PathBuf, reason: String },

    /// The parallel arrays of an upload record are not index-aligned.
    #[error("malformed upload record: field '{field}' has {actual} entries, expected {expected}")]
    MalformedRecord {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl FileError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for file operations.
pub type FileResult<T> = Result<T, FileError>;
