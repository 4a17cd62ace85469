use intake_types::FileDescriptor;

use crate::error::ValidateResult;

/// The outcome of running one validator against one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The file satisfies the rule.
    Pass,
    /// The file violates the rule.
    Fail { reason: String },
}

impl Verdict {
    /// Shorthand for a failing verdict.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail { reason } => Some(reason),
        }
    }
}

/// A single acceptance rule.
///
/// The trait is object-safe and `Send + Sync` so rules can be stored in a
/// `Vec<Box<dyn Validator>>` and evaluated in attachment order.
pub trait Validator: Send + Sync {
    /// Short name of the rule (e.g. "extension", "size").
    fn name(&self) -> &str;

    /// Inspect the file and return a verdict.
    fn validate(&self, file: &FileDescriptor) -> ValidateResult<Verdict>;
}
