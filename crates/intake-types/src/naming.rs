//! Safe-name derivation for untrusted client file names.
//!
//! A client-declared name is split like path-info (final segment, stem,
//! extension). The stem is stripped of every character outside a small ASCII
//! allow-list and of every run of two or more dots, then reduced to its
//! final path segment. The extension is lowercased.

use std::sync::LazyLock;

use regex::Regex;

/// Characters outside the ASCII allow-list, or any run of two or more dots.
///
/// POSIX classes stay ASCII-only in Unicode mode, so non-ASCII letters,
/// separators and combining marks are all stripped.
static UNSAFE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^[:word:][:space:]\-~,;:\[\]\(\).]|\.{2,}").expect("static pattern compiles")
});

/// A sanitized file name: stem plus lowercase extension (no leading dot).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SafeName {
    stem: String,
    extension: String,
}

impl SafeName {
    /// Derive a safe name from the desired (possibly hostile) file name.
    pub fn derive(desired: &str) -> Self {
        let (stem, extension) = split_path_info(desired);
        let cleaned = UNSAFE_RUNS.replace_all(stem, "");
        Self {
            stem: final_segment(&cleaned).to_string(),
            extension: extension.to_lowercase(),
        }
    }

    /// The sanitized name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The lowercase extension without a leading dot; empty if none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether the name can be used as a file name in a directory.
    ///
    /// Sanitizing may leave nothing, or a lone `.`, behind.
    pub fn is_usable(&self) -> bool {
        let full = self.with_extension();
        !full.is_empty() && full != "."
    }

    /// `stem.extension`, or just the stem when there is no extension.
    pub fn with_extension(&self) -> String {
        if self.extension.is_empty() {
            self.stem.clone()
        } else {
            format!("{}.{}", self.stem, self.extension)
        }
    }
}

impl std::fmt::Display for SafeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.with_extension())
    }
}

/// Last path segment, ignoring trailing separators. Both `/` and `\` count.
fn final_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Split into (stem, extension) at the last dot of the final segment.
fn split_path_info(desired: &str) -> (&str, &str) {
    let segment = final_segment(desired);
    match segment.rfind('.') {
        Some(dot) => (&segment[..dot], &segment[dot + 1..]),
        None => (segment, ""),
    }
}
