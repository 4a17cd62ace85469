//! Upload batches for Intake.
//!
//! A batch takes raw upload input (a local path, a form field looked up in
//! an [`UploadTransport`](intake_types::UploadTransport), or a raw record),
//! normalizes it into file descriptors, runs a validator chain over every
//! file collecting every failure, and commits the files to a storage
//! backend only when nothing failed.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use intake_batch::{UploadBatch, UploadSource};
//! use intake_storage::InMemoryStorage;
//! use intake_types::StagedUploads;
//! use intake_validate::Extension;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("notes.txt");
//! std::fs::write(&path, b"hello").unwrap();
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! let mut batch = UploadBatch::new(
//!     UploadSource::Path(path),
//!     Arc::new(StagedUploads::new()),
//!     storage.clone(),
//! )
//! .unwrap();
//! batch.add_validation(Box::new(Extension::new(["txt"])));
//!
//! assert!(batch.is_valid());
//! batch.store().unwrap();
//! assert_eq!(storage.get("notes.txt").unwrap(), b"hello");
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod intake;

pub use batch::{BatchState, UploadBatch};
pub use config::IntakeConfig;
pub use error::{BatchError, BatchResult};
pub use intake::{IntakeOutcome, UploadSource};
