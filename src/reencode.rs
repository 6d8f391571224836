//! Constrained re-encoding.
//!
//! Brings an accepted upload within the [`EncodeBudget`]: at most
//! `max_dimension` pixels on the longer side and at most `max_bytes` encoded.
//!
//! ## State machine
//!
//! ```text
//! Decoding ─▶ DimensionCheck ─┬─▶ Passthrough                      (already fits)
//!                             └─▶ Resizing ─▶ Encoding(q=85) ─┬─▶ Success
//!                                                             ├─▶ Fail            (PNG)
//!                                                             └─▶ Encoding(q=60) ─┬─▶ Success
//!                                                                                 └─▶ Fail
//! ```
//!
//! The quality schedule is fixed: one pass for PNG (quality is meaningless
//! for a lossless format), two passes for JPEG. There is no search loop, so
//! worst-case work is bounded at one decode, one render and two encodes.
//!
//! The decode handle is scoped to the decode call and released before the
//! dimension check, whether decoding succeeded or not.

use crate::imaging::{
    Dimensions, EncodeBudget, HandleRegistry, OutputFormat, Quality, RasterError, Rasterizer,
    Surface, fit_within,
};
use crate::output::human_size;
use crate::upload::{CandidateFile, Encoding, PreparedFile};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ReencodeError {
    #[error("Image processing failed: {0}")]
    Decode(#[from] RasterError),
    #[error("{}", budget_message(.format, *.size, *.limit))]
    BudgetUnsatisfiable {
        format: OutputFormat,
        /// Size of the last (smallest) attempt.
        size: u64,
        limit: u64,
    },
}

fn budget_message(format: &OutputFormat, size: u64, limit: u64) -> String {
    match format {
        OutputFormat::Png => format!(
            "PNG image is still {} after resizing and cannot be compressed further \
             (limit {}); please upload a smaller image",
            human_size(size),
            human_size(limit)
        ),
        OutputFormat::Jpeg => format!(
            "Could not compress image below {} (best attempt {}); please upload a smaller image",
            human_size(limit),
            human_size(size)
        ),
    }
}

/// Encode attempts for a given output format, in order.
pub fn quality_schedule(format: OutputFormat) -> &'static [Quality] {
    const LOSSY: &[Quality] = &[Quality::FIRST_PASS, Quality::RETRY];
    const LOSSLESS: &[Quality] = &[Quality::FIRST_PASS];
    if format.is_lossy() { LOSSY } else { LOSSLESS }
}

/// Re-encodes candidates under a fixed budget.
///
/// Holds no per-invocation state: every call to [`reencode`](Self::reencode)
/// owns its surface and decode handle. Shareable across threads when the
/// rasterizer is.
pub struct Reencoder<R: Rasterizer> {
    rasterizer: R,
    budget: EncodeBudget,
    handles: HandleRegistry,
}

impl<R: Rasterizer> Reencoder<R> {
    pub fn new(rasterizer: R, budget: EncodeBudget) -> Self {
        Self {
            rasterizer,
            budget,
            handles: HandleRegistry::new(),
        }
    }

    pub fn budget(&self) -> EncodeBudget {
        self.budget
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Decode handle accounting across all invocations.
    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    /// Bring `candidate` within budget.
    ///
    /// Callers are expected to have run [`validate`](crate::validate::validate)
    /// first. A declared type outside the allow-set cannot be decoded and
    /// fails as [`ReencodeError::Decode`].
    pub fn reencode(&self, candidate: &CandidateFile) -> Result<PreparedFile, ReencodeError> {
        let media_type = candidate.accepted_type().ok_or_else(|| {
            RasterError::Decode(format!(
                "no decoder for declared type {:?}",
                candidate.media_type()
            ))
        })?;

        let surface = {
            let handle = self.handles.acquire(candidate.bytes());
            self.rasterizer.decode(&handle, media_type)
        }?;
        let source = surface.dimensions();
        debug!(
            name = candidate.name(),
            %media_type,
            %source,
            bytes = candidate.byte_size(),
            "decoded"
        );

        if self.budget.admits(source, candidate.byte_size()) {
            info!(name = candidate.name(), "within budget, passing through");
            return Ok(PreparedFile::passthrough(candidate, media_type, source));
        }

        let target = fit_within(source, self.budget.max_dimension);
        let resized;
        let surface = if target == source {
            &surface
        } else {
            debug!(%source, %target, "resizing");
            resized = self.rasterizer.render(&surface, target)?;
            &resized
        };

        let format = OutputFormat::for_input(media_type);
        self.encode_within_budget(candidate, surface, target, format)
    }

    fn encode_within_budget(
        &self,
        candidate: &CandidateFile,
        surface: &R::Surface,
        dimensions: Dimensions,
        format: OutputFormat,
    ) -> Result<PreparedFile, ReencodeError> {
        let mut last_size = 0;

        for (attempt, &quality) in (1u8..).zip(quality_schedule(format)) {
            let bytes = self.rasterizer.encode(surface, format, quality)?;
            let size = bytes.len() as u64;

            if self.budget.fits_bytes(size) {
                info!(
                    name = candidate.name(),
                    %format,
                    %dimensions,
                    quality = quality.value(),
                    attempt,
                    size,
                    "re-encoded"
                );
                return Ok(PreparedFile {
                    name: candidate.name().to_string(),
                    media_type: format.media_type(),
                    bytes,
                    dimensions,
                    last_modified: SystemTime::now(),
                    encoding: Encoding::Reencoded {
                        quality,
                        attempts: attempt,
                    },
                });
            }

            debug!(
                %format,
                quality = quality.value(),
                attempt,
                size,
                limit = self.budget.max_bytes,
                "encoded output over budget"
            );
            last_size = size;
        }

        warn!(
            name = candidate.name(),
            %format,
            size = last_size,
            limit = self.budget.max_bytes,
            "cannot bring image under budget"
        );
        Err(ReencodeError::BudgetUnsatisfiable {
            format,
            size: last_size,
            limit: self.budget.max_bytes,
        })
    }
}
