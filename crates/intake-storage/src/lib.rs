//! Storage backends for Intake.
//!
//! A backend takes one validated [`FileDescriptor`](intake_types::FileDescriptor)
//! and moves its bytes to their final place. Backends never validate; the
//! batch only hands them files after the whole batch passed.
//!
//! # Storage Backends
//!
//! All backends implement the [`StorageBackend`] trait:
//!
//! - [`FileSystemStorage`] -- moves files into a directory on local disk
//! - [`InMemoryStorage`] -- copies file contents into a map, for tests and dry runs
//!
//! # Design Rules
//!
//! 1. The destination name is always the descriptor's safe name.
//! 2. Existing files are never replaced unless the backend allows overwrite.
//! 3. Upload-origin files move only through the upload transport.
//! 4. Backend configuration is checked once, at construction.
//! 5. All I/O errors are propagated with the name of the offending file.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod memory;
pub mod traits;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use filesystem::FileSystemStorage;
pub use memory::InMemoryStorage;
pub use traits::{StorageBackend, StoredFile};
