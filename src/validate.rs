//! Admission check run before any decode work.
//!
//! Validation is pure and synchronous: it looks at the declared media type
//! and the byte size, never at the bytes themselves. The type check runs
//! first, so a `text/plain` file is reported as unsupported however large it
//! is. The declared type must match an allowed MIME string exactly.
//!
//! The admission ceiling (50 MiB by default) only guards against decoding
//! pathologically large originals. It is independent of, and larger than,
//! the [`EncodeBudget`](crate::imaging::EncodeBudget) the output must meet.

use crate::media::{MediaType, accepted_labels};
use crate::output::human_size;
use crate::upload::CandidateFile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default admission ceiling for originals (50 MiB).
pub const DEFAULT_MAX_ORIGINAL_BYTES: u64 = 50 * 1024 * 1024;

/// Pre-decode admission limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdmissionLimits {
    /// Originals larger than this are rejected without decoding.
    pub max_original_bytes: u64,
}

impl AdmissionLimits {
    /// No ceiling at all.
    pub fn unbounded() -> Self {
        Self {
            max_original_bytes: u64::MAX,
        }
    }
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self {
            max_original_bytes: DEFAULT_MAX_ORIGINAL_BYTES,
        }
    }
}

/// Why a candidate was turned away.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Unsupported file format {declared:?} (supported: {})", accepted_labels())]
    UnsupportedType { declared: String },
    #[error(
        "Original file is too large ({}); please upload an image smaller than {}",
        human_size(*.size),
        human_size(*.limit)
    )]
    OriginalTooLarge { size: u64, limit: u64 },
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected(reason) => Err(reason),
        }
    }
}

/// Validate against the default admission ceiling.
pub fn validate(candidate: &CandidateFile) -> Verdict {
    validate_with(candidate, &AdmissionLimits::default())
}

/// Validate against explicit admission limits.
pub fn validate_with(candidate: &CandidateFile, limits: &AdmissionLimits) -> Verdict {
    if MediaType::from_mime(candidate.media_type()).is_none() {
        return Verdict::Rejected(Rejection::UnsupportedType {
            declared: candidate.media_type().to_string(),
        });
    }

    if candidate.byte_size() > limits.max_original_bytes {
        return Verdict::Rejected(Rejection::OriginalTooLarge {
            size: candidate.byte_size(),
            limit: limits.max_original_bytes,
        });
    }

    Verdict::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ACCEPTED_MEDIA_TYPES;

    const MIB: usize = 1024 * 1024;

    fn candidate(media_type: &str, size: usize) -> CandidateFile {
        CandidateFile::new("upload", media_type, vec![0u8; size])
    }

    #[test]
    fn accepts_every_allowed_type() {
        for t in ACCEPTED_MEDIA_TYPES {
            assert_eq!(validate(&candidate(t.as_mime(), 1024)), Verdict::Accepted);
        }
    }

    #[test]
    fn accepts_empty_file() {
        // Emptiness is a decode problem, not an admission one
        assert!(validate(&candidate("image/png", 0)).is_accepted());
    }

    #[test]
    fn rejects_disallowed_types() {
        for mime in [
            "text/plain",
            "image/tiff",
            "application/pdf",
            "",
            "IMAGE/PNG",
            "image/jpeg; charset=binary",
        ] {
            let verdict = validate(&candidate(mime, 10));
            assert!(
                matches!(
                    &verdict,
                    Verdict::Rejected(Rejection::UnsupportedType { declared }) if declared == mime
                ),
                "{mime:?} → {verdict:?}"
            );
        }
    }

    #[test]
    fn text_file_with_image_name_is_unsupported() {
        let c = CandidateFile::new("photo.png", "text/plain", b"not an image".to_vec());
        assert!(matches!(
            validate(&c),
            Verdict::Rejected(Rejection::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_originals_over_ceiling_for_every_type() {
        for t in ACCEPTED_MEDIA_TYPES {
            let verdict = validate(&candidate(t.as_mime(), 51 * MIB));
            assert!(
                matches!(
                    verdict,
                    Verdict::Rejected(Rejection::OriginalTooLarge { size, limit })
                        if size == 51 * MIB as u64 && limit == DEFAULT_MAX_ORIGINAL_BYTES
                ),
                "{t}"
            );
        }
    }

    #[test]
    fn ceiling_is_inclusive() {
        assert!(validate(&candidate("image/jpeg", 50 * MIB)).is_accepted());
        assert!(!validate(&candidate("image/jpeg", 50 * MIB + 1)).is_accepted());
    }

    #[test]
    fn type_check_runs_before_size_check() {
        let verdict = validate(&candidate("text/plain", 51 * MIB));
        assert!(matches!(
            verdict,
            Verdict::Rejected(Rejection::UnsupportedType { .. })
        ));
    }

    #[test]
    fn custom_limits_apply() {
        let limits = AdmissionLimits {
            max_original_bytes: 100,
        };
        assert!(validate_with(&candidate("image/png", 100), &limits).is_accepted());
        assert!(!validate_with(&candidate("image/png", 101), &limits).is_accepted());
    }

    #[test]
    fn validation_does_not_touch_candidate() {
        let c = candidate("image/gif", 16);
        let before = c.clone();
        let _ = validate(&c);
        assert_eq!(c, before);
    }

    #[test]
    fn rejection_messages() {
        let unsupported = Rejection::UnsupportedType {
            declared: "text/plain".into(),
        };
        assert_eq!(
            unsupported.to_string(),
            "Unsupported file format \"text/plain\" (supported: JPG, PNG, GIF, WebP)"
        );

        let too_large = Rejection::OriginalTooLarge {
            size: 51 * MIB as u64,
            limit: DEFAULT_MAX_ORIGINAL_BYTES,
        };
        assert_eq!(
            too_large.to_string(),
            "Original file is too large (51.0 MiB); please upload an image smaller than 50.0 MiB"
        );
    }

    #[test]
    fn verdict_into_result() {
        assert!(Verdict::Accepted.into_result().is_ok());
        let err = validate(&candidate("text/plain", 1)).into_result().unwrap_err();
        assert!(matches!(err, Rejection::UnsupportedType { .. }));
    }
}
