//! Parameter types for the re-encode stage.
//!
//! These describe *what* the output must look like, not *how* pixels get
//! there. The [`Reencoder`](crate::reencode::Reencoder) decides which values to
//! use; the [`Rasterizer`](super::backend::Rasterizer) does the pixel work.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100). Clamped on construction.
//! - [`OutputFormat`] — PNG or JPEG; PNG inputs stay PNG, everything else becomes JPEG.
//! - [`EncodeBudget`] — Longer-side pixel ceiling plus byte ceiling for the final file.

use super::backend::Dimensions;
use crate::media::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default ceiling for the longer side of a prepared image, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Default ceiling for the size of a prepared image, in bytes (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    /// First encode attempt (0.85).
    pub const FIRST_PASS: Quality = Quality(85);
    /// The single reduced-quality retry (0.6).
    pub const RETRY: Quality = Quality(60);

    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Quality as a 0.0–1.0 factor.
    pub fn as_factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::FIRST_PASS
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// PNG is never transcoded to a lossy format; every other input becomes JPEG.
    pub fn for_input(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Png => OutputFormat::Png,
            MediaType::Jpeg | MediaType::Gif | MediaType::Webp => OutputFormat::Jpeg,
        }
    }

    pub fn media_type(self) -> MediaType {
        match self {
            OutputFormat::Png => MediaType::Png,
            OutputFormat::Jpeg => MediaType::Jpeg,
        }
    }

    /// Whether the encoder honours a [`Quality`] setting.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Size and dimension contract a prepared image must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeBudget {
    /// Ceiling for the longer side, in pixels.
    pub max_dimension: u32,
    /// Ceiling for the encoded file, in bytes.
    pub max_bytes: u64,
}

impl Default for EncodeBudget {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl EncodeBudget {
    pub fn fits_dimensions(&self, dims: Dimensions) -> bool {
        dims.width <= self.max_dimension && dims.height <= self.max_dimension
    }

    pub fn fits_bytes(&self, byte_size: u64) -> bool {
        byte_size <= self.max_bytes
    }

    /// True when a file of this size and shape can ship as-is.
    pub fn admits(&self, dims: Dimensions, byte_size: u64) -> bool {
        self.fits_dimensions(dims) && self.fits_bytes(byte_size)
    }
}
