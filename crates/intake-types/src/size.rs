//! Human-readable byte sizes (`"10K"`, `"3M"`, ...).

use serde::{Deserialize, Serialize};

/// Convert a human-readable size such as `"10K"` or `"3M"` into bytes.
///
/// The leading integer is parsed best-effort (leading whitespace and a `+`
/// sign are accepted; a `-` sign or a non-numeric prefix yields 0). The final
/// character, case-insensitive, selects the unit: `b` = 1, `k` = 1024,
/// `m` = 1048576, `g` = 1073741824. Any other final character leaves the
/// number as a plain byte count.
pub fn human_readable_to_bytes(input: &str) -> u64 {
    let number = leading_integer(input);
    let factor = match input.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('b') => 1,
        Some('k') => 1 << 10,
        Some('m') => 1 << 20,
        Some('g') => 1 << 30,
        _ => 1,
    };
    number.saturating_mul(factor)
}

fn leading_integer(input: &str) -> u64 {
    let trimmed = input.trim_start();
    let unsigned = match trimmed.as_bytes().first() {
        Some(b'-') => return 0,
        Some(b'+') => &trimmed[1..],
        _ => trimmed,
    };
    unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}

/// A byte limit given either as a raw count or as a human-readable string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeLimit {
    Bytes(u64),
    Human(String),
}

impl SizeLimit {
    /// Resolve the limit to a byte count.
    pub fn to_bytes(&self) -> u64 {
        match self {
            Self::Bytes(n) => *n,
            Self::Human(s) => human_readable_to_bytes(s),
        }
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::Bytes(0)
    }
}

impl From<u64> for SizeLimit {
    fn from(bytes: u64) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&str> for SizeLimit {
    fn from(s: &str) -> Self {
        Self::Human(s.to_string())
    }
}

impl From<String> for SizeLimit {
    fn from(s: String) -> Self {
        Self::Human(s)
    }
}
