use intake_types::FileDescriptor;

use crate::error::ValidateResult;
use crate::validator::{Validator, Verdict};

/// Accepts files whose extension is in an allow-list.
///
/// Matching is case-insensitive: the allow-list is lowercased at
/// construction and descriptor extensions are already lowercase.
#[derive(Clone, Debug)]
pub struct Extension {
    allowed: Vec<String>,
}

impl Extension {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// The normalized allow-list, in the order it was given.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Validator for Extension {
    fn name(&self) -> &str {
        "extension"
    }

    fn validate(&self, file: &FileDescriptor) -> ValidateResult<Verdict> {
        let extension = file.extension().to_lowercase();
        if self.allowed.iter().any(|allowed| *allowed == extension) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!(
                "Invalid file extension. Must be one of: {}",
                self.allowed.join(", ")
            )))
        }
    }
}
