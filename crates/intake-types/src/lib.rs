//! Foundation types for Intake.
//!
//! Every other Intake crate depends on `intake-types`. It models one
//! candidate file as a [`FileDescriptor`], derives safe names from untrusted
//! client input, parses human-readable sizes, and describes the raw upload
//! records handed over by an upload transport.
//!
//! # Key Types
//!
//! - [`FileDescriptor`] -- Normalized view of one candidate file with lazy probes
//! - [`SafeName`] -- Sanitized stem and lowercase extension derived once
//! - [`RawUpload`] -- Scalar or parallel-array upload record (`name`, `tmp_name`, `error`, `size`)
//! - [`UploadStatus`] -- Transport status code with its fixed description table
//! - [`UploadTransport`] -- Injected upload record and provenance oracle
//! - [`SizeLimit`] -- Byte count given as an integer or a string such as `"3M"`

pub mod descriptor;
pub mod error;
pub mod naming;
pub mod probe;
pub mod record;
pub mod size;
pub mod transport;

pub use descriptor::{FileDescriptor, Origin};
pub use error::{FileError, FileResult};
pub use naming::SafeName;
pub use probe::{Dimensions, HashAlgorithm};
pub use record::{OneOrMany, RawUpload, UploadEntry, UploadStatus};
pub use size::{human_readable_to_bytes, SizeLimit};
pub use transport::{StagedUploads, UploadTransport};
