//! Raw upload records as handed over by an upload transport.
//!
//! A record carries four index-aligned fields (`name`, `tmp_name`, `error`,
//! `size`). Each field is either a scalar (one upload) or an array of N
//! values (a batch of N uploads from one form field).

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FileError, FileResult};

/// A record field holding either one value or a parallel array of values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Number of values carried by this field.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    /// Returns `true` for an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`; a scalar answers only index 0.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            Self::One(value) => (index == 0).then_some(value),
            Self::Many(values) => values.get(index),
        }
    }
}

/// Status code reported by the upload transport for one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    /// The item was received completely.
    Ok,
    /// Code 1.
    ServerSizeExceeded,
    /// Code 2.
    FormSizeExceeded,
    /// Code 3.
    Partial,
    /// Code 4.
    NoFile,
    /// Code 6.
    NoTempDirectory,
    /// Code 7.
    CannotWrite,
    /// Code 8.
    Aborted,
    /// Any code outside the known table.
    Unknown(u16),
}

impl UploadStatus {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::ServerSizeExceeded,
            2 => Self::FormSizeExceeded,
            3 => Self::Partial,
            4 => Self::NoFile,
            6 => Self::NoTempDirectory,
            7 => Self::CannotWrite,
            8 => Self::Aborted,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 0,
            Self::ServerSizeExceeded => 1,
            Self::FormSizeExceeded => 2,
            Self::Partial => 3,
            Self::NoFile => 4,
            Self::NoTempDirectory => 6,
            Self::CannotWrite => 7,
            Self::Aborted => 8,
            Self::Unknown(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Human-readable description used in intake error messages.
    pub fn description(&self) -> Cow<'static, str> {
        match self {
            Self::Ok => Cow::Borrowed("upload succeeded"),
            Self::ServerSizeExceeded => {
                Cow::Borrowed("exceeds server-configured maximum file size")
            }
            Self::FormSizeExceeded => Cow::Borrowed("exceeds form-declared maximum file size"),
            Self::Partial => Cow::Borrowed("partially uploaded"),
            Self::NoFile => Cow::Borrowed("no file was uploaded"),
            Self::NoTempDirectory => Cow::Borrowed("missing temporary storage location"),
            Self::CannotWrite => Cow::Borrowed("failed to persist to temporary storage"),
            Self::Aborted => Cow::Borrowed("upload aborted by an extension/middleware"),
            Self::Unknown(code) => Cow::Owned(format!("unknown upload error (code {code})")),
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// One item of a record, after un-zipping the parallel arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadEntry {
    /// Client-declared file name (untrusted).
    pub name: String,
    /// Temporary location the transport staged the bytes at.
    pub tmp_name: PathBuf,
    pub status: UploadStatus,
    /// Size reported by the transport, if any.
    pub size: Option<u64>,
}

/// A raw upload record: scalar fields for one upload, parallel arrays for
/// a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUpload {
    pub name: OneOrMany<String>,
    pub tmp_name: OneOrMany<PathBuf>,
    pub error: OneOrMany<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<OneOrMany<u64>>,
}

impl RawUpload {
    /// Record for a single upload.
    pub fn single(
        name: impl Into<String>,
        tmp_name: impl Into<PathBuf>,
        status: UploadStatus,
        size: Option<u64>,
    ) -> Self {
        Self {
            name: OneOrMany::One(name.into()),
            tmp_name: OneOrMany::One(tmp_name.into()),
            error: OneOrMany::One(status.code()),
            size: size.map(OneOrMany::One),
        }
    }

    /// Parallel-array record built from individual entries.
    pub fn from_entries(entries: Vec<UploadEntry>) -> Self {
        let sizes: Option<Vec<u64>> = entries.iter().map(|e| e.size).collect();
        Self {
            name: OneOrMany::Many(entries.iter().map(|e| e.name.clone()).collect()),
            tmp_name: OneOrMany::Many(entries.iter().map(|e| e.tmp_name.clone()).collect()),
            error: OneOrMany::Many(entries.iter().map(|e| e.status.code()).collect()),
            size: sizes.map(OneOrMany::Many),
        }
    }

    /// Number of items in the record (the length of `tmp_name`).
    pub fn len(&self) -> usize {
        self.tmp_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tmp_name.is_empty()
    }

    /// Un-zip the record into entries, in index order.
    ///
    /// Fails if the parallel arrays are not all the same length.
    pub fn entries(&self) -> FileResult<Vec<UploadEntry>> {
        let expected = self.len();
        check_len("name", expected, self.name.len())?;
        check_len("error", expected, self.error.len())?;
        if let Some(size) = &self.size {
            check_len("size", expected, size.len())?;
        }

        let mut entries = Vec::with_capacity(expected);
        for index in 0..expected {
            // Lengths were checked above, so every index resolves.
            let (Some(name), Some(tmp_name), Some(code)) = (
                self.name.get(index),
                self.tmp_name.get(index),
                self.error.get(index),
            ) else {
                continue;
            };
            entries.push(UploadEntry {
                name: name.clone(),
                tmp_name: tmp_name.clone(),
                status: UploadStatus::from_code(*code),
                size: self
                    .size
                    .as_ref()
                    .and_then(|s| s.get(index))
                    .copied(),
            });
        }
        Ok(entries)
    }

    /// Temporary paths of the items the transport reported as successful.
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        (0..self.len())
            .filter(|&i| {
                self.error
                    .get(i)
                    .is_some_and(|code| UploadStatus::from_code(*code).is_ok())
            })
            .filter_map(|i| self.tmp_name.get(i).cloned())
            .collect()
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> FileResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FileError::MalformedRecord {
            field,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table_round_trips_known_codes() {
        for code in [0u16, 1, 2, 3, 4, 6, 7, 8] {
            assert_eq!(UploadStatus::from_code(code).code(), code);
        }
        assert_eq!(UploadStatus::from_code(5), UploadStatus::Unknown(5));
    }

    #[test]
    fn status_descriptions() {
        assert_eq!(
            UploadStatus::from_code(1).description(),
            "exceeds server-configured maximum file size"
        );
        assert_eq!(UploadStatus::from_code(3).to_string(), "partially uploaded");
        assert_eq!(UploadStatus::NoFile.to_string(), "no file was uploaded");
        assert_eq!(
            UploadStatus::Aborted.to_string(),
            "upload aborted by an extension/middleware"
        );
        assert_eq!(
            UploadStatus::from_code(42).to_string(),
            "unknown upload error (code 42)"
        );
    }

    #[test]
    fn scalar_record_from_json() {
        let json = r#"{"name":"a.png","tmp_name":"/tmp/php1","error":0,"size":12}"#;
        let record: RawUpload = serde_json::from_str(json).unwrap();
        assert_eq!(record.len(), 1);
        let entries = record.entries().unwrap();
        assert_eq!(entries[0].name, "a.png");
        assert_eq!(entries[0].tmp_name, PathBuf::from("/tmp/php1"));
        assert!(entries[0].status.is_ok());
        assert_eq!(entries[0].size, Some(12));
    }

    #[test]
    fn array_record_from_json() {
        let json = r#"{
            "name": ["a.png", "b.png", "c.png"],
            "tmp_name": ["/tmp/1", "/tmp/2", "/tmp/3"],
            "error": [0, 3, 0],
            "size": [10, 0, 30]
        }"#;
        let record: RawUpload = serde_json::from_str(json).unwrap();
        let entries = record.entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].status, UploadStatus::Partial);
        assert_eq!(entries[2].size, Some(30));
        assert_eq!(
            record.staged_paths(),
            vec![PathBuf::from("/tmp/1"), PathBuf::from("/tmp/3")]
        );
    }

    #[test]
    fn size_is_optional() {
        let json = r#"{"name":["a"],"tmp_name":["/tmp/a"],"error":[0]}"#;
        let record: RawUpload = serde_json::from_str(json).unwrap();
        assert_eq!(record.entries().unwrap()[0].size, None);
    }

    #[test]
    fn misaligned_arrays_are_rejected() {
        let record = RawUpload {
            name: OneOrMany::Many(vec!["a".into(), "b".into()]),
            tmp_name: OneOrMany::Many(vec!["/tmp/a".into(), "/tmp/b".into()]),
            error: OneOrMany::Many(vec![0]),
            size: None,
        };
        let err = record.entries().unwrap_err();
        assert!(matches!(
            err,
            FileError::MalformedRecord { field: "error", expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn from_entries_builds_parallel_arrays() {
        let record = RawUpload::from_entries(vec![
            UploadEntry {
                name: "a".into(),
                tmp_name: "/tmp/a".into(),
                status: UploadStatus::Ok,
                size: Some(1),
            },
            UploadEntry {
                name: "b".into(),
                tmp_name: "/tmp/b".into(),
                status: UploadStatus::NoFile,
                size: Some(0),
            },
        ]);
        assert_eq!(record.error, OneOrMany::Many(vec![0, 4]));
        assert_eq!(record.size, Some(OneOrMany::Many(vec![1, 0])));
        assert_eq!(record.entries().unwrap().len(), 2);
    }
}
