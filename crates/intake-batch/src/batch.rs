//! The upload batch: intake, validation, and all-or-nothing commit.

use std::fmt;
use std::sync::Arc;

use intake_storage::{StorageBackend, StoredFile};
use intake_types::{FileDescriptor, UploadTransport};
use intake_validate::{Validator, Verdict};
use tracing::{debug, error, info, warn};

use crate::error::{BatchError, BatchResult};
use crate::intake::{IntakeOutcome, UploadSource};

/// Lifecycle of a batch.
///
/// `Intaken -> Validated -> Committed`, or `-> Rejected` when `store()` is
/// refused or a backend fails. Committed and Rejected are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Intaken,
    Validated,
    Committed,
    Rejected,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Intaken => "intaken",
            Self::Validated => "validated",
            Self::Committed => "committed",
            Self::Rejected => "rejected",
        })
    }
}

/// A group of files received together and validated together.
///
/// The validator chain runs once per batch. Every validator runs against
/// every descriptor and every failure is collected; nothing short-circuits
/// except the provenance check on upload-origin files. The batch is valid
/// only when intake and validation both produced no errors.
pub struct UploadBatch {
    files: Vec<FileDescriptor>,
    upload_errors: Vec<String>,
    validation_errors: Vec<String>,
    validators: Vec<Box<dyn Validator>>,
    storage: Arc<dyn StorageBackend>,
    state: BatchState,
}

impl UploadBatch {
    /// Build a batch from a single source.
    pub fn new(
        source: UploadSource,
        transport: Arc<dyn UploadTransport>,
        storage: Arc<dyn StorageBackend>,
    ) -> BatchResult<Self> {
        Self::from_sources([source], transport, storage)
    }

    /// Build one batch from several sources, keeping their order.
    pub fn from_sources(
        sources: impl IntoIterator<Item = UploadSource>,
        transport: Arc<dyn UploadTransport>,
        storage: Arc<dyn StorageBackend>,
    ) -> BatchResult<Self> {
        let mut outcome = IntakeOutcome::default();
        for source in sources {
            outcome.ingest(source, &transport)?;
        }
        debug!(
            files = outcome.files.len(),
            upload_errors = outcome.errors.len(),
            "batch intaken"
        );
        Ok(Self {
            files: outcome.files,
            upload_errors: outcome.errors,
            validation_errors: Vec::new(),
            validators: Vec::new(),
            storage,
            state: BatchState::Intaken,
        })
    }

    /// Append a validator to the chain.
    ///
    /// Validators added after the batch was validated are kept but never run.
    pub fn add_validation(&mut self, validator: Box<dyn Validator>) -> &mut Self {
        if self.state != BatchState::Intaken {
            warn!(
                validator = validator.name(),
                state = %self.state,
                "validator added after validation ran; it will not run"
            );
        }
        self.validators.push(validator);
        self
    }

    /// Append several validators, in order.
    pub fn add_validations(
        &mut self,
        validators: impl IntoIterator<Item = Box<dyn Validator>>,
    ) -> &mut Self {
        for validator in validators {
            self.add_validation(validator);
        }
        self
    }

    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }

    /// Descriptors in intake order.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Intake errors, one per failed upload item.
    pub fn upload_errors(&self) -> &[String] {
        &self.upload_errors
    }

    /// Validation errors. Empty until [`is_valid`](Self::is_valid) or
    /// [`store`](Self::store) has run the chain.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// True when every upload item arrived intact.
    pub fn is_uploaded(&self) -> bool {
        self.upload_errors.is_empty()
    }

    /// Run the validator chain if it has not run yet and report validity.
    ///
    /// Repeated calls return the cached verdict without re-running
    /// validators.
    pub fn is_valid(&mut self) -> bool {
        if self.state == BatchState::Intaken {
            self.run_validators();
            self.state = BatchState::Validated;
        }
        self.upload_errors.is_empty() && self.validation_errors.is_empty()
    }

    fn run_validators(&mut self) {
        for file in &mut self.files {
            let name = file.name_with_extension();

            if file.is_from_upload() && !file.is_uploaded_file() {
                warn!(
                    file = %name,
                    path = %file.source_path().display(),
                    "file was not staged by the upload transport"
                );
                let message = format!("{name}: Is not an uploaded file");
                file.add_error(message.clone());
                self.validation_errors.push(message);
                continue;
            }

            if !file.safe_name().is_usable() {
                warn!(declared = %file.declared_name(), "declared name has no usable safe name");
                let message = format!("{}: Has no usable file name", file.declared_name());
                file.add_error(message.clone());
                self.validation_errors.push(message);
            }

            for validator in &self.validators {
                let reason = match validator.validate(file) {
                    Ok(Verdict::Pass) => {
                        debug!(file = %name, validator = validator.name(), "passed");
                        continue;
                    }
                    Ok(Verdict::Fail { reason }) => reason,
                    Err(err) => {
                        warn!(file = %name, validator = validator.name(), error = %err, "probe failed");
                        err.to_string()
                    }
                };
                debug!(file = %name, validator = validator.name(), %reason, "failed");
                let message = format!("{name}: {reason}");
                file.add_error(message.clone());
                self.validation_errors.push(message);
            }
        }
        debug!(
            files = self.files.len(),
            validators = self.validators.len(),
            errors = self.validation_errors.len(),
            "validation finished"
        );
    }

    /// Commit every file to the storage backend, in intake order.
    ///
    /// Runs validation first if needed. An invalid batch is rejected
    /// without any backend call. A backend failure stops at the failing
    /// file; earlier files stay stored.
    pub fn store(&mut self) -> BatchResult<Vec<StoredFile>> {
        if matches!(self.state, BatchState::Committed | BatchState::Rejected) {
            return Err(BatchError::Finished(self.state));
        }

        if !self.is_valid() {
            self.state = BatchState::Rejected;
            info!(
                upload_errors = self.upload_errors.len(),
                validation_errors = self.validation_errors.len(),
                "batch rejected"
            );
            return Err(BatchError::Rejected {
                upload_errors: self.upload_errors.clone(),
                validation_errors: self.validation_errors.clone(),
            });
        }

        let mut stored = Vec::with_capacity(self.files.len());
        for (index, file) in self.files.iter().enumerate() {
            match self.storage.store(file) {
                Ok(placed) => stored.push(placed),
                Err(source) => {
                    self.state = BatchState::Rejected;
                    let name = file.name_with_extension();
                    error!(file = %name, index, error = %source, "storage failed");
                    return Err(BatchError::Storage {
                        file: name,
                        index,
                        source,
                    });
                }
            }
        }

        self.state = BatchState::Committed;
        info!(files = stored.len(), "batch committed");
        Ok(stored)
    }
}

impl fmt::Debug for UploadBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadBatch")
            .field("files", &self.files)
            .field("upload_errors", &self.upload_errors)
            .field("validation_errors", &self.validation_errors)
            .field("validators", &self.validators.len())
            .field("state", &self.state)
            .finish()
    }
}
