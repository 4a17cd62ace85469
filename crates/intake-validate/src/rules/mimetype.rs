use intake_types::FileDescriptor;

use crate::error::ValidateResult;
use crate::validator::{Validator, Verdict};

/// Accepts files whose sniffed mimetype is in an allow-list.
///
/// Comparison is exact; the descriptor already lowercases the mimetype and
/// strips its parameters.
#[derive(Clone, Debug)]
pub struct Mimetype {
    allowed: Vec<String>,
}

impl Mimetype {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Validator for Mimetype {
    fn name(&self) -> &str {
        "mimetype"
    }

    fn validate(&self, file: &FileDescriptor) -> ValidateResult<Verdict> {
        let mimetype = file.mimetype()?;
        if self.allowed.iter().any(|allowed| allowed == mimetype) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!(
                "Invalid mimetype. Must be one of: {}",
                self.allowed.join(", ")
            )))
        }
    }
}
