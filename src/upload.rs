//! Upload file model.
//!
//! A [`CandidateFile`] is what the user picked: a name, a declared media
//! type, the raw bytes and a modification time. It is immutable once built.
//! A [`PreparedFile`] is what comes out of the pipeline: bytes guaranteed to
//! respect the encode budget, ready to be base64-encoded for transport.

use crate::imaging::{Dimensions, Quality};
use crate::media::MediaType;
use crate::validate::AdmissionLimits;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CandidateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// A user-selected file awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
    /// Size on disk, equal to `bytes.len()` unless reading was skipped.
    byte_size: u64,
    last_modified: SystemTime,
}

impl CandidateFile {
    /// Build a candidate from in-memory bytes (clipboard paste, drag-and-drop).
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            byte_size: bytes.len() as u64,
            bytes,
            last_modified: SystemTime::now(),
        }
    }

    /// Read a candidate from disk.
    ///
    /// The media type is inferred from the extension; unknown extensions get
    /// an empty type, which the validator rejects.
    pub fn from_path(path: &Path) -> Result<Self, CandidateError> {
        Self::from_path_within(path, &AdmissionLimits::unbounded())
    }

    /// Read a candidate from disk unless it is above the admission ceiling.
    ///
    /// An oversized file is never read: the candidate carries its on-disk
    /// size and no bytes, so validation against the same `limits` rejects
    /// it before anything is allocated.
    pub fn from_path_within(
        path: &Path,
        limits: &AdmissionLimits,
    ) -> Result<Self, CandidateError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CandidateError::NoFileName(path.to_path_buf()))?
            .to_string();
        let metadata = std::fs::metadata(path)?;
        let byte_size = metadata.len();
        let last_modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        let media_type = MediaType::from_path(path)
            .map(|t| t.as_mime().to_string())
            .unwrap_or_default();

        let (bytes, byte_size) = if byte_size > limits.max_original_bytes {
            tracing::debug!(
                %name,
                byte_size,
                limit = limits.max_original_bytes,
                "over admission ceiling, not reading"
            );
            (Vec::new(), byte_size)
        } else {
            let bytes = std::fs::read(path)?;
            let len = bytes.len() as u64;
            (bytes, len)
        };

        Ok(Self {
            name,
            media_type,
            bytes,
            byte_size,
            last_modified,
        })
    }

    /// Replace the declared media type.
    pub fn with_media_type(self, media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            ..self
        }
    }

    pub fn with_last_modified(self, last_modified: SystemTime) -> Self {
        Self {
            last_modified,
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared MIME string, verbatim.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The declared type, if it is in the allow-set.
    pub fn accepted_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.media_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

/// How a prepared file was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Original bytes, already within budget.
    Passthrough,
    /// Rendered and encoded; `attempts` is 1 or 2.
    Reencoded { quality: Quality, attempts: u8 },
}

/// A file that satisfies the encode budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFile {
    /// Original file name, preserved.
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
    /// Candidate's timestamp on passthrough, generation time otherwise.
    pub last_modified: SystemTime,
    pub encoding: Encoding,
}

impl PreparedFile {
    /// Wrap a candidate that already fits, bytes untouched.
    pub(crate) fn passthrough(
        candidate: &CandidateFile,
        media_type: MediaType,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            name: candidate.name.clone(),
            media_type,
            bytes: candidate.bytes.clone(),
            dimensions,
            last_modified: candidate.last_modified,
            encoding: Encoding::Passthrough,
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_passthrough(&self) -> bool {
        self.encoding == Encoding::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Rejection, Verdict, validate_with};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn new_candidate_keeps_declared_type_verbatim() {
        let c = CandidateFile::new("photo.png", "text/plain", b"hello".to_vec());
        assert_eq!(c.name(), "photo.png");
        assert_eq!(c.media_type(), "text/plain");
        assert_eq!(c.accepted_type(), None);
        assert_eq!(c.byte_size(), 5);
    }

    #[test]
    fn from_path_infers_type_from_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shot.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let c = CandidateFile::from_path(&path).unwrap();
        assert_eq!(c.name(), "shot.webp");
        assert_eq!(c.media_type(), "image/webp");
        assert_eq!(c.accepted_type(), Some(MediaType::Webp));
        assert_eq!(c.bytes(), b"RIFF");
    }

    #[test]
    fn from_path_unknown_extension_has_empty_type() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();

        let c = CandidateFile::from_path(&path).unwrap();
        assert_eq!(c.media_type(), "");
        assert_eq!(c.accepted_type(), None);
    }

    #[test]
    fn from_path_missing_file_errors() {
        let result = CandidateFile::from_path(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(CandidateError::Io(_))));
    }

    #[test]
    fn from_path_within_skips_reading_oversized_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("huge.png");
        std::fs::write(&path, vec![7u8; 2048]).unwrap();
        let limits = AdmissionLimits {
            max_original_bytes: 1024,
        };

        let c = CandidateFile::from_path_within(&path, &limits).unwrap();
        assert!(c.bytes().is_empty());
        assert_eq!(c.byte_size(), 2048);
        assert_eq!(c.media_type(), "image/png");
        assert!(matches!(
            validate_with(&c, &limits),
            Verdict::Rejected(Rejection::OriginalTooLarge {
                size: 2048,
                limit: 1024,
            })
        ));
    }

    #[test]
    fn from_path_within_reads_file_at_ceiling() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("edge.png");
        std::fs::write(&path, vec![7u8; 1024]).unwrap();
        let limits = AdmissionLimits {
            max_original_bytes: 1024,
        };

        let c = CandidateFile::from_path_within(&path, &limits).unwrap();
        assert_eq!(c.bytes().len(), 1024);
        assert_eq!(c.byte_size(), 1024);
    }

    #[test]
    fn with_media_type_overrides_inferred_type() {
        let c = CandidateFile::new("a.jpg", "image/jpeg", vec![]).with_media_type("image/png");
        assert_eq!(c.accepted_type(), Some(MediaType::Png));
    }

    #[test]
    fn passthrough_preserves_bytes_name_and_timestamp() {
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let c = CandidateFile::new("small.png", "image/png", vec![1, 2, 3])
            .with_last_modified(stamp);
        let dims = Dimensions {
            width: 100,
            height: 100,
        };

        let p = PreparedFile::passthrough(&c, MediaType::Png, dims);
        assert_eq!(p.name, "small.png");
        assert_eq!(p.bytes, vec![1, 2, 3]);
        assert_eq!(p.last_modified, stamp);
        assert!(p.is_passthrough());
        assert_eq!(p.byte_size(), 3);
    }
}
