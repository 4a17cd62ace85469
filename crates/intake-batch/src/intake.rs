//! Intake: normalizing raw upload input into file descriptors.
//!
//! Items the transport reported as failed never become descriptors; they
//! are recorded as `"<declared name>: <status description>"` and the rest of
//! the record is processed normally.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use intake_types::{FileDescriptor, RawUpload, UploadStatus, UploadTransport};
use tracing::{debug, warn};

use crate::error::BatchResult;

/// One of the input shapes a batch accepts.
#[derive(Clone, Debug)]
pub enum UploadSource {
    /// An existing regular file on local disk.
    Path(PathBuf),
    /// A form field to look up in the transport's records.
    Field(String),
    /// A raw record passed in directly.
    Raw(RawUpload),
}

impl UploadSource {
    /// Treat `input` as a path if it names an existing regular file, and as
    /// a form field otherwise.
    pub fn detect(input: &str) -> Self {
        if Path::new(input).is_file() {
            Self::Path(PathBuf::from(input))
        } else {
            Self::Field(input.to_string())
        }
    }
}

impl From<RawUpload> for UploadSource {
    fn from(record: RawUpload) -> Self {
        Self::Raw(record)
    }
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Descriptors and intake errors produced from one or more sources.
#[derive(Debug, Default)]
pub struct IntakeOutcome {
    /// Descriptors in intake order.
    pub files: Vec<FileDescriptor>,
    /// Per-item intake errors in intake order.
    pub errors: Vec<String>,
}

impl IntakeOutcome {
    /// Normalize `source`, appending to this outcome.
    ///
    /// Fails only if a raw record's parallel arrays are misaligned.
    pub fn ingest(
        &mut self,
        source: UploadSource,
        transport: &Arc<dyn UploadTransport>,
    ) -> BatchResult<()> {
        match source {
            UploadSource::Path(path) => {
                if path.is_file() {
                    debug!(path = %path.display(), "intake of local file");
                    self.files.push(FileDescriptor::local(path));
                } else {
                    warn!(path = %path.display(), "intake path is not a regular file");
                    self.errors
                        .push(format!("{}: Is not a regular file", path.display()));
                }
            }
            UploadSource::Field(field) => match transport.record(&field) {
                Some(record) => self.ingest_record(&record, transport)?,
                None => {
                    warn!(%field, "no upload record for field");
                    self.errors.push(format!("{field}: {}", UploadStatus::NoFile));
                }
            },
            UploadSource::Raw(record) => self.ingest_record(&record, transport)?,
        }
        Ok(())
    }

    fn ingest_record(
        &mut self,
        record: &RawUpload,
        transport: &Arc<dyn UploadTransport>,
    ) -> BatchResult<()> {
        for entry in record.entries()? {
            if !entry.status.is_ok() {
                warn!(
                    name = %entry.name,
                    code = entry.status.code(),
                    "skipping failed upload item"
                );
                self.errors.push(format!("{}: {}", entry.name, entry.status));
                continue;
            }
            self.files
                .push(FileDescriptor::from_entry(&entry, Arc::clone(transport)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::{StagedUploads, UploadEntry};

    fn transport() -> Arc<dyn UploadTransport> {
        Arc::new(StagedUploads::new())
    }

    fn entry(name: &str, code: u16) -> UploadEntry {
        UploadEntry {
            name: name.into(),
            tmp_name: format!("/tmp/{name}").into(),
            status: UploadStatus::from_code(code),
            size: None,
        }
    }

    #[test]
    fn failed_items_are_skipped_in_order() {
        let record = RawUpload::from_entries(vec![
            entry("one.png", 0),
            entry("two.png", 1),
            entry("three.png", 0),
        ]);
        let mut outcome = IntakeOutcome::default();
        outcome.ingest(record.into(), &transport()).unwrap();

        assert_eq!(
            outcome.errors,
            ["two.png: exceeds server-configured maximum file size"]
        );
        let names: Vec<String> = outcome.files.iter().map(|f| f.name_with_extension()).collect();
        assert_eq!(names, ["one.png", "three.png"]);
    }

    #[test]
    fn scalar_failure_produces_no_descriptor() {
        let record = RawUpload::single("a.txt", "/tmp/a", UploadStatus::Partial, None);
        let mut outcome = IntakeOutcome::default();
        outcome.ingest(record.into(), &transport()).unwrap();
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.errors, ["a.txt: partially uploaded"]);
    }

    #[test]
    fn every_status_code_has_a_message() {
        let codes = [1u16, 2, 3, 4, 6, 7, 8];
        let record = RawUpload::from_entries(
            codes.iter().map(|&c| entry(&format!("f{c}"), c)).collect(),
        );
        let mut outcome = IntakeOutcome::default();
        outcome.ingest(record.into(), &transport()).unwrap();
        assert_eq!(
            outcome.errors,
            [
                "f1: exceeds server-configured maximum file size",
                "f2: exceeds form-declared maximum file size",
                "f3: partially uploaded",
                "f4: no file was uploaded",
                "f6: missing temporary storage location",
                "f7: failed to persist to temporary storage",
                "f8: upload aborted by an extension/middleware",
            ]
        );
    }

    #[test]
    fn missing_field_is_an_intake_error() {
        let mut outcome = IntakeOutcome::default();
        outcome
            .ingest(UploadSource::Field("avatar".into()), &transport())
            .unwrap();
        assert_eq!(outcome.errors, ["avatar: no file was uploaded"]);
    }

    #[test]
    fn field_resolves_through_transport() {
        let staged = Arc::new(StagedUploads::new());
        staged.stage("docs", RawUpload::from_entries(vec![entry("a.pdf", 0)]));
        let transport: Arc<dyn UploadTransport> = staged;

        let mut outcome = IntakeOutcome::default();
        outcome
            .ingest(UploadSource::Field("docs".into()), &transport)
            .unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].is_from_upload());
    }

    #[test]
    fn local_path_becomes_local_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.csv");
        std::fs::write(&path, b"a,b").unwrap();

        let mut outcome = IntakeOutcome::default();
        outcome.ingest(path.into(), &transport()).unwrap();
        assert_eq!(outcome.files[0].name_with_extension(), "local.csv");
        assert!(!outcome.files[0].is_from_upload());
    }

    #[test]
    fn directory_path_is_an_intake_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut outcome = IntakeOutcome::default();
        outcome
            .ingest(dir.path().to_path_buf().into(), &transport())
            .unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome.errors[0].ends_with(": Is not a regular file"));
    }

    #[test]
    fn detect_prefers_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        std::fs::write(&path, b"x").unwrap();
        let as_str = path.to_str().unwrap();

        assert!(matches!(UploadSource::detect(as_str), UploadSource::Path(_)));
        assert!(matches!(UploadSource::detect("avatar"), UploadSource::Field(_)));
    }

    #[test]
    fn misaligned_record_fails() {
        let mut record = RawUpload::from_entries(vec![entry("a", 0), entry("b", 0)]);
        record.name = intake_types::OneOrMany::One("a".into());
        let mut outcome = IntakeOutcome::default();
        assert!(outcome.ingest(record.into(), &transport()).is_err());
    }
}
