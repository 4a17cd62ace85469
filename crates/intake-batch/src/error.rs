use std::io;

use intake_storage::StorageError;
use intake_types::FileError;
use intake_validate::ValidateError;

use crate::batch::BatchState;

/// Errors that abort a batch operation.
///
/// Per-file problems found during intake and validation are not errors:
/// they are collected as messages on the batch. These variants cover what
/// happens when a caller tries to commit anyway, or when the batch cannot
/// be built at all.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// `store()` was called on a batch with intake or validation errors.
    /// The storage backend was not touched.
    #[error(
        "file upload/validation failed: {} upload error(s), {} validation error(s)",
        .upload_errors.len(),
        .validation_errors.len()
    )]
    Rejected {
        upload_errors: Vec<String>,
        validation_errors: Vec<String>,
    },

    /// The storage backend failed on one file. Files before it in the batch
    /// were already stored and are not rolled back.
    #[error("storing {file} (file {index} of the batch) failed: {source}")]
    Storage {
        file: String,
        index: usize,
        #[source]
        source: StorageError,
    },

    /// The batch already reached a terminal state.
    #[error("batch is already {0}")]
    Finished(BatchState),

    /// The upload record could not be read.
    #[error(transparent)]
    Record(#[from] FileError),

    /// The validator chain could not be built.
    #[error("invalid validation rules: {0}")]
    Validation(#[from] ValidateError),

    /// The storage backend could not be created.
    #[error("invalid storage backend: {0}")]
    Backend(#[from] StorageError),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BatchError {
    /// Every intake and validation message carried by a rejection.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::Rejected {
                upload_errors,
                validation_errors,
            } => upload_errors
                .iter()
                .chain(validation_errors)
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Result alias for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
