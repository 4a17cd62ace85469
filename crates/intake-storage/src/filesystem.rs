use std::fs;
use std::path::{Path, PathBuf};

use intake_types::FileDescriptor;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::traits::{StorageBackend, StoredFile};

/// Stores files in a directory on local disk.
///
/// The directory must exist and be writable when the backend is created;
/// this is not re-checked per file. Destinations are
/// `<directory>/<safe name with extension>`.
#[derive(Clone, Debug)]
pub struct FileSystemStorage {
    directory: PathBuf,
    overwrite: bool,
}

impl FileSystemStorage {
    /// Create a backend for `directory`.
    ///
    /// Fails if the directory does not exist or a probe file cannot be
    /// created in it.
    pub fn new(directory: impl Into<PathBuf>, overwrite: bool) -> StorageResult<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(StorageError::DirectoryMissing(directory));
        }

        // The probe file is removed again when it is dropped.
        tempfile::Builder::new()
            .prefix(".intake-probe-")
            .tempfile_in(&directory)
            .map_err(|source| StorageError::DirectoryNotWritable {
                path: directory.clone(),
                source,
            })?;

        debug!(directory = %directory.display(), overwrite, "filesystem storage ready");
        Ok(Self {
            directory,
            overwrite,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Destination path for `file`.
    pub fn destination(&self, file: &FileDescriptor) -> StorageResult<PathBuf> {
        if !file.safe_name().is_usable() {
            return Err(StorageError::InvalidName(file.declared_name().to_string()));
        }
        Ok(self.directory.join(file.name_with_extension()))
    }
}

impl StorageBackend for FileSystemStorage {
    fn store(&self, file: &FileDescriptor) -> StorageResult<StoredFile> {
        let destination = self.destination(file)?;
        let name = file.name_with_extension();

        // symlink_metadata also sees dangling links.
        if !self.overwrite && fs::symlink_metadata(&destination).is_ok() {
            return Err(StorageError::AlreadyExists(name));
        }

        file.move_to(&destination)
            .map_err(|source| StorageError::MoveFailed {
                name: name.clone(),
                source,
            })?;

        info!(
            file = %name,
            destination = %destination.display(),
            uploaded = file.is_from_upload(),
            "stored file"
        );
        Ok(StoredFile {
            name,
            location: destination,
        })
    }
}
