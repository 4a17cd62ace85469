//! The normalized view of one candidate file.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{FileError, FileResult};
use crate::naming::SafeName;
use crate::probe::{self, Dimensions, HashAlgorithm};
use crate::record::UploadEntry;
use crate::transport::UploadTransport;

/// Where a descriptor's bytes came from.
#[derive(Clone)]
pub enum Origin {
    /// Staged by an upload transport; provenance is checked against it.
    Upload(Arc<dyn UploadTransport>),
    /// A pre-existing file on local disk.
    Local,
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload(_) => f.write_str("Upload"),
            Self::Local => f.write_str("Local"),
        }
    }
}

/// One candidate file pending validation and storage.
///
/// The safe name and extension are derived once, at construction, from the
/// declared name. Size, mimetype, hashes and dimensions are probed lazily
/// and cached for the lifetime of the descriptor.
pub struct FileDescriptor {
    source_path: PathBuf,
    declared_name: String,
    safe_name: SafeName,
    origin: Origin,
    declared_size: Option<u64>,
    size: OnceLock<u64>,
    mimetype: OnceLock<String>,
    hashes: [OnceLock<String>; 2],
    dimensions: OnceLock<Dimensions>,
    errors: Vec<String>,
}

impl FileDescriptor {
    /// Descriptor for a pre-existing local file, named after its path.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let declared = path.to_string_lossy().into_owned();
        Self::build(path, declared, Origin::Local, None)
    }

    /// Descriptor for a pre-existing local file stored under another name.
    pub fn local_named(path: impl Into<PathBuf>, declared_name: impl Into<String>) -> Self {
        Self::build(path.into(), declared_name.into(), Origin::Local, None)
    }

    /// Descriptor for a file staged by `transport` at `tmp_path`.
    pub fn uploaded(
        tmp_path: impl Into<PathBuf>,
        declared_name: impl Into<String>,
        transport: Arc<dyn UploadTransport>,
    ) -> Self {
        Self::build(
            tmp_path.into(),
            declared_name.into(),
            Origin::Upload(transport),
            None,
        )
    }

    /// Descriptor for one successful item of an upload record.
    pub fn from_entry(entry: &UploadEntry, transport: Arc<dyn UploadTransport>) -> Self {
        Self::build(
            entry.tmp_name.clone(),
            entry.name.clone(),
            Origin::Upload(transport),
            entry.size,
        )
    }

    fn build(
        source_path: PathBuf,
        declared_name: String,
        origin: Origin,
        declared_size: Option<u64>,
    ) -> Self {
        let safe_name = SafeName::derive(&declared_name);
        Self {
            source_path,
            declared_name,
            safe_name,
            origin,
            declared_size,
            size: OnceLock::new(),
            mimetype: OnceLock::new(),
            hashes: [OnceLock::new(), OnceLock::new()],
            dimensions: OnceLock::new(),
            errors: Vec::new(),
        }
    }

    /// Filesystem location of the bytes.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The name as submitted by the client (untrusted).
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// The derived safe name.
    pub fn safe_name(&self) -> &SafeName {
        &self.safe_name
    }

    /// Safe name without extension.
    pub fn name(&self) -> &str {
        self.safe_name.stem()
    }

    /// Lowercase extension without the leading dot.
    pub fn extension(&self) -> &str {
        self.safe_name.extension()
    }

    /// Safe name with its extension, as used for storage and messages.
    pub fn name_with_extension(&self) -> String {
        self.safe_name.with_extension()
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Whether this descriptor claims to come from the upload transport.
    pub fn is_from_upload(&self) -> bool {
        matches!(self.origin, Origin::Upload(_))
    }

    /// Whether the transport confirms it staged the source path.
    ///
    /// Always `false` for local files.
    pub fn is_uploaded_file(&self) -> bool {
        match &self.origin {
            Origin::Upload(transport) => transport.is_uploaded_file(&self.source_path),
            Origin::Local => false,
        }
    }

    /// Size the transport reported, if any.
    pub fn declared_size(&self) -> Option<u64> {
        self.declared_size
    }

    /// Size in bytes, read from the filesystem on first use.
    pub fn size(&self) -> FileResult<u64> {
        cached(&self.size, || {
            fs::metadata(&self.source_path)
                .map(|meta| meta.len())
                .map_err(|e| FileError::io(&self.source_path, e))
        })
        .copied()
    }

    /// Lowercase mimetype without parameters, sniffed on first use.
    pub fn mimetype(&self) -> FileResult<&str> {
        cached(&self.mimetype, || {
            let mimetype = probe::sniff_mimetype(&self.source_path)?;
            debug!(file = %self.safe_name, %mimetype, "sniffed mimetype");
            Ok(mimetype)
        })
        .map(String::as_str)
    }

    /// Hex-encoded content hash, computed on first use per algorithm.
    pub fn hash(&self, algorithm: HashAlgorithm) -> FileResult<&str> {
        cached(&self.hashes[algorithm.slot()], || {
            probe::hash_file(&self.source_path, algorithm)
        })
        .map(String::as_str)
    }

    /// Image dimensions, read from the file header on first use.
    pub fn dimensions(&self) -> FileResult<Dimensions> {
        cached(&self.dimensions, || probe::image_dimensions(&self.source_path)).copied()
    }

    /// Validation annotations recorded against this file.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Append a non-fatal validation annotation.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Move the bytes to `destination`.
    ///
    /// Upload-origin files go through the transport, which refuses paths it
    /// did not stage. Local files are renamed.
    pub fn move_to(&self, destination: &Path) -> io::Result<()> {
        match &self.origin {
            Origin::Upload(transport) => {
                transport.move_uploaded_file(&self.source_path, destination)
            }
            Origin::Local => fs::rename(&self.source_path, destination),
        }
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDescriptor")
            .field("source_path", &self.source_path)
            .field("declared_name", &self.declared_name)
            .field("safe_name", &self.safe_name.with_extension())
            .field("origin", &self.origin)
            .field("errors", &self.errors.len())
            .finish()
    }
}

/// Return the cached value, computing and storing it on first access.
fn cached<T>(cell: &OnceLock<T>, init: impl FnOnce() -> FileResult<T>) -> FileResult<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}
