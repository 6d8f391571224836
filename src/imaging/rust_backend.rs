//! Pure Rust rasterizer built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image::ImageReader::with_format` (format pinned to the declared type) |
//! | Decode limits | `image::Limits::no_limits`, optional `max_alloc` |
//! | Render | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` on an RGB8 buffer |

use super::backend::{Dimensions, RasterError, Rasterizer, Surface};
use super::handle::DecodeHandle;
use super::params::{OutputFormat, Quality};
use crate::media::MediaType;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::error::ImageError;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageReader, Limits};
use std::io::Cursor;

impl Surface for DynamicImage {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Rasterizer using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
///
/// Decoding runs without the `image` crate's default 512 MiB allocation
/// limit: the admission ceiling on the encoded size is what bounds the
/// input, and a 50 MiB original can legitimately decode to several hundred
/// megapixels. [`with_max_alloc`](Self::with_max_alloc) puts a cap back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRasterizer {
    max_alloc: Option<u64>,
}

impl ImageRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap decoder allocations at `bytes`.
    pub fn with_max_alloc(bytes: u64) -> Self {
        Self {
            max_alloc: Some(bytes),
        }
    }

    fn limits(&self) -> Limits {
        let mut limits = Limits::no_limits();
        limits.max_alloc = self.max_alloc;
        limits
    }
}

impl Rasterizer for ImageRasterizer {
    type Surface = DynamicImage;

    fn decode(
        &self,
        handle: &DecodeHandle<'_>,
        media_type: MediaType,
    ) -> Result<DynamicImage, RasterError> {
        // The declared type picks the decoder; bytes of another format fail here.
        let mut reader =
            ImageReader::with_format(Cursor::new(handle.bytes()), media_type.image_format());
        reader.limits(self.limits());
        let img = reader.decode().map_err(|e| match e {
            ImageError::Limits(e) => {
                RasterError::Decode(format!("{media_type} image exceeds decoder limits: {e}"))
            }
            e => RasterError::Decode(format!("not a valid {media_type} image: {e}")),
        })?;

        if img.width() == 0 || img.height() == 0 {
            return Err(RasterError::Decode(format!(
                "{media_type} image has no pixels"
            )));
        }
        Ok(img)
    }

    fn render(
        &self,
        surface: &DynamicImage,
        target: Dimensions,
    ) -> Result<DynamicImage, RasterError> {
        if target.width == 0 || target.height == 0 {
            return Err(RasterError::Render(format!(
                "invalid target dimensions {target}"
            )));
        }
        Ok(surface.resize_exact(target.width, target.height, FilterType::Lanczos3))
    }

    fn encode(
        &self,
        surface: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, RasterError> {
        let mut buf = Vec::new();
        match format {
            OutputFormat::Png => {
                surface
                    .write_with_encoder(PngEncoder::new(&mut buf))
                    .map_err(|e| RasterError::Encode(format!("PNG encode failed: {e}")))?;
            }
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = surface.to_rgb8();
                JpegEncoder::new_with_quality(&mut buf, quality.value())
                    .encode(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| RasterError::Encode(format!("JPEG encode failed: {e}")))?;
            }
        }
        Ok(buf)
    }
}
