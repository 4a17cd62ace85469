//! Thin wrappers over content probing: mimetype sniffing, content hashing,
//! and image dimensions.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{FileError, FileResult};

/// Bytes read from the head of a file when sniffing its type.
const SNIFF_LEN: u64 = 8 * 1024;

/// Hash algorithm used for content hashes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Sha256 => 0,
            Self::Blake3 => 1,
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Sniff the mimetype of the file at `path` from its leading bytes.
///
/// Known binary signatures win; otherwise UTF-8 free of control bytes is
/// `text/plain` and anything else `application/octet-stream`. Empty files
/// are `inode/x-empty`.
pub fn sniff_mimetype(path: &Path) -> FileResult<String> {
    let mut head = Vec::new();
    File::open(path)
        .and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head))
        .map_err(|e| FileError::io(path, e))?;
    Ok(normalize_mimetype(classify(&head)))
}

fn classify(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return "inode/x-empty";
    }
    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }
    if is_text(head) {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// UTF-8 (a multi-byte character cut off by the sniff window is allowed)
/// with no control bytes other than tab, LF, CR and form feed.
fn is_text(head: &[u8]) -> bool {
    let utf8 = match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    utf8 && !head
        .iter()
        .any(|&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C)) || b == 0x7F)
}

/// Lowercase a mimetype and drop any parameters (`; charset=...`).
pub fn normalize_mimetype(raw: &str) -> String {
    raw.split([';', ','])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Hex-encoded content hash of the file at `path`.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> FileResult<String> {
    let mut file = File::open(path).map_err(|e| FileError::io(path, e))?;
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            io::copy(&mut file, &mut hasher).map_err(|e| FileError::io(path, e))?;
            Ok(hex::encode(hasher.finalize()))
        }
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            io::copy(&mut file, &mut hasher).map_err(|e| FileError::io(path, e))?;
            Ok(hasher.finalize().to_hex().to_string())
        }
    }
}

/// Width and height of the image at `path`, read from its header.
pub fn image_dimensions(path: &Path) -> FileResult<Dimensions> {
    let (width, height) = image::image_dimensions(path).map_err(|e| FileError::Dimensions {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Dimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_parameters() {
        assert_eq!(normalize_mimetype("Text/Plain; charset=us-ascii"), "text/plain");
        assert_eq!(normalize_mimetype("image/png , foo"), "image/png");
        assert_eq!(normalize_mimetype(""), "");
    }

    #[test]
    fn classify_signatures_and_text() {
        assert_eq!(classify(b""), "inode/x-empty");
        assert_eq!(classify(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
        assert_eq!(classify(b"GIF89a\x01\x00\x01\x00"), "image/gif");
        assert_eq!(classify(b"just some notes\n"), "text/plain");
        assert_eq!(classify(&[0xC3, 0x28, 0xA0, 0xA1, 0x01]), "application/octet-stream");
    }

    #[test]
    fn nul_bytes_are_binary() {
        assert_eq!(classify(&[0u8; 64]), "application/octet-stream");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zeros.bin");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        assert_eq!(sniff_mimetype(&path).unwrap(), "application/octet-stream");
    }

    #[test]
    fn control_bytes_are_binary() {
        assert_eq!(classify(b"header\x01\x02\x1bdata"), "application/octet-stream");
        assert_eq!(classify(b"tail\x7f"), "application/octet-stream");
        assert_eq!(classify(b"col1\tcol2\r\nrow\x0cpage\n"), "text/plain");
    }

    #[test]
    fn truncated_utf8_is_text() {
        // "é" is two bytes; keep only the first.
        assert_eq!(classify(&[b'a', 0xC3]), "text/plain");
    }

    #[test]
    fn sha256_matches_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(
            hash_file(&path, HashAlgorithm::Sha256).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn blake3_matches_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(
            hash_file(&path, HashAlgorithm::Blake3).unwrap(),
            blake3::hash(b"hello world").to_hex().to_string()
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = sniff_mimetype(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }

    #[test]
    fn dimensions_of_generated_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbImage::new(3, 2).save(&path).unwrap();
        assert_eq!(image_dimensions(&path).unwrap(), Dimensions { width: 3, height: 2 });
    }

    #[test]
    fn dimensions_of_text_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(image_dimensions(&path), Err(FileError::Dimensions { .. })));
    }
}
