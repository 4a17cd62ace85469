use intake_types::{FileDescriptor, SizeLimit};

use crate::error::ValidateResult;
use crate::validator::{Validator, Verdict};

/// Accepts files whose size lies within `[min, max]` (both inclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Size {
    min: u64,
    max: u64,
}

impl Size {
    /// Limit the size to `max`; the minimum defaults to 0.
    ///
    /// Limits are byte counts or human-readable strings such as `"3M"`.
    pub fn new(max: impl Into<SizeLimit>) -> Self {
        Self {
            min: 0,
            max: max.into().to_bytes(),
        }
    }

    /// Also require at least `min` bytes.
    pub fn with_min(mut self, min: impl Into<SizeLimit>) -> Self {
        self.min = min.into().to_bytes();
        self
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }
}

impl Validator for Size {
    fn name(&self) -> &str {
        "size"
    }

    fn validate(&self, file: &FileDescriptor) -> ValidateResult<Verdict> {
        let size = file.size()?;

        if size < self.min {
            return Ok(Verdict::fail(format!(
                "File size is too small. Must be greater than or equal to: {}",
                self.min
            )));
        }

        if size > self.max {
            return Ok(Verdict::fail(format!(
                "File size is too large. Must be less than: {}",
                self.max
            )));
        }

        Ok(Verdict::Pass)
    }
}
