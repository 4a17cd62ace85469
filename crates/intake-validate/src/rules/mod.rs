//! Built-in validators.

pub mod extension;
pub mod mimetype;
pub mod size;

pub use extension::Extension;
pub use mimetype::Mimetype;
pub use size::Size;
