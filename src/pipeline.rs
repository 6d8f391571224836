//! Validate-then-re-encode facade.
//!
//! [`Pipeline::prepare`] is the single entry point UI code calls with a
//! freshly selected file. It either returns a [`PreparedFile`] that respects
//! the encode budget or a [`PrepError`] whose message can be shown to the
//! user as-is. Every failure is terminal for that invocation only; the
//! pipeline holds no per-call state and can be reused immediately.

use crate::config::PrepConfig;
use crate::imaging::{ImageRasterizer, Rasterizer};
use crate::reencode::{ReencodeError, Reencoder};
use crate::upload::{CandidateFile, PreparedFile};
use crate::validate::{AdmissionLimits, Rejection, Verdict, validate_with};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Reencode(#[from] ReencodeError),
}

/// Validator plus re-encoder, configured once at startup.
pub struct Pipeline<R: Rasterizer = ImageRasterizer> {
    admission: AdmissionLimits,
    reencoder: Reencoder<R>,
}

impl Pipeline<ImageRasterizer> {
    /// Pipeline backed by the `image` crate.
    pub fn new(config: &PrepConfig) -> Self {
        Self::with_rasterizer(config, ImageRasterizer::new())
    }
}

impl Default for Pipeline<ImageRasterizer> {
    fn default() -> Self {
        Self::new(&PrepConfig::default())
    }
}

impl<R: Rasterizer> Pipeline<R> {
    pub fn with_rasterizer(config: &PrepConfig, rasterizer: R) -> Self {
        Self {
            admission: config.admission,
            reencoder: Reencoder::new(rasterizer, config.budget),
        }
    }

    pub fn reencoder(&self) -> &Reencoder<R> {
        &self.reencoder
    }

    /// Admission check only; no decode work.
    pub fn check(&self, candidate: &CandidateFile) -> Verdict {
        validate_with(candidate, &self.admission)
    }

    /// Validate, then bring the candidate within budget.
    pub fn prepare(&self, candidate: &CandidateFile) -> Result<PreparedFile, PrepError> {
        self.check(candidate).into_result().inspect_err(|reason| {
            tracing::info!(name = candidate.name(), %reason, "upload rejected");
        })?;
        Ok(self.reencoder.reencode(candidate)?)
    }
}
