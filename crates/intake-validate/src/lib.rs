//! Acceptance rules for Intake.
//!
//! A validator inspects one [`FileDescriptor`](intake_types::FileDescriptor)
//! and returns a [`Verdict`]. Validators are stateless after construction and
//! never modify the file; the batch that runs them decides what a failure
//! means.
//!
//! # Quick Start
//!
//! ```rust
//! use intake_types::FileDescriptor;
//! use intake_validate::{Extension, Validator};
//!
//! let rule = Extension::new(["png", "GIF"]);
//! let file = FileDescriptor::local("/uploads/cat.jpg");
//! let verdict = rule.validate(&file).unwrap();
//! assert_eq!(
//!     verdict.reason(),
//!     Some("Invalid file extension. Must be one of: png, gif")
//! );
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod validator;

pub use config::ValidationConfig;
pub use error::{ValidateError, ValidateResult};
pub use rules::{Extension, Mimetype, Size};
pub use validator::{Validator, Verdict};
