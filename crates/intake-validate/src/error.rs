use intake_types::FileError;

/// Errors a validator can raise while inspecting a file.
///
/// A rule that simply does not accept a file returns
/// [`Verdict::Fail`](crate::Verdict::Fail) instead; these errors mean the
/// file could not be inspected at all.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Reading a lazy property (size, mimetype, ...) failed.
    #[error("{0}")]
    Probe(#[from] FileError),

    /// The rule itself is misconfigured.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for validator operations.
pub type ValidateResult<T> = Result<T, ValidateError>;
