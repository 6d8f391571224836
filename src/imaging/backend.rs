//! Rasterizer trait and shared types.
//!
//! The [`Rasterizer`] trait defines the three primitives the re-encode stage
//! needs: decode raw bytes into a surface, render a surface at new dimensions,
//! and encode a surface to bytes.
//!
//! The production implementation is
//! [`ImageRasterizer`](super::rust_backend::ImageRasterizer), built on the
//! `image` crate. Tests use a recording mock so pipeline control flow can be
//! checked without encoding real pixels.

use super::handle::DecodeHandle;
use super::params::{OutputFormat, Quality};
use crate::media::MediaType;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn longer_side(self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded raster.
pub trait Surface {
    fn dimensions(&self) -> Dimensions;
}

/// Decode, render and encode primitives.
///
/// Implementations must be `Sync`: a single rasterizer serves every
/// concurrent pipeline invocation.
pub trait Rasterizer: Sync {
    type Surface: Surface;

    /// Decode the bytes behind `handle` as an image of `media_type`.
    fn decode(
        &self,
        handle: &DecodeHandle<'_>,
        media_type: MediaType,
    ) -> Result<Self::Surface, RasterError>;

    /// Draw `surface` into a new surface of exactly `target` dimensions.
    fn render(
        &self,
        surface: &Self::Surface,
        target: Dimensions,
    ) -> Result<Self::Surface, RasterError>;

    /// Encode `surface`. `quality` is ignored by lossless formats.
    fn encode(
        &self,
        surface: &Self::Surface,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, RasterError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Surface stand-in that only knows its size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MockSurface(pub Dimensions);

    impl Surface for MockSurface {
        fn dimensions(&self) -> Dimensions {
            self.0
        }
    }

    /// Mock rasterizer that records operations without touching pixels.
    ///
    /// Encoded output is a zero-filled buffer whose length is taken from
    /// `encoded_sizes` in call order. Uses Mutex (not RefCell) so it is Sync.
    #[derive(Default)]
    pub struct MockRasterizer {
        pub decoded: Option<Dimensions>,
        pub encoded_sizes: Mutex<VecDeque<usize>>,
        pub fail_render: bool,
        pub fail_encode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode {
            media_type: MediaType,
            bytes: usize,
        },
        Render {
            width: u32,
            height: u32,
        },
        Encode {
            width: u32,
            height: u32,
            format: OutputFormat,
            quality: u8,
        },
    }

    impl MockRasterizer {
        /// Decodes every input to a surface of `width`x`height`.
        pub fn decoding(width: u32, height: u32) -> Self {
            Self {
                decoded: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        /// Fails every decode.
        pub fn undecodable() -> Self {
            Self::default()
        }

        pub fn with_encoded_sizes(self, sizes: Vec<usize>) -> Self {
            Self {
                encoded_sizes: Mutex::new(sizes.into()),
                ..self
            }
        }

        pub fn failing_render(self) -> Self {
            Self {
                fail_render: true,
                ..self
            }
        }

        pub fn failing_encode(self) -> Self {
            Self {
                fail_encode: true,
                ..self
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Qualities passed to `encode`, in call order.
        pub fn encode_qualities(&self) -> Vec<u8> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Encode { quality, .. } => Some(quality),
                    _ => None,
                })
                .collect()
        }
    }

    impl Rasterizer for MockRasterizer {
        type Surface = MockSurface;

        fn decode(
            &self,
            handle: &DecodeHandle<'_>,
            media_type: MediaType,
        ) -> Result<MockSurface, RasterError> {
            self.operations.lock().unwrap().push(RecordedOp::Decode {
                media_type,
                bytes: handle.bytes().len(),
            });
            self.decoded
                .map(MockSurface)
                .ok_or_else(|| RasterError::Decode("mock decode failure".to_string()))
        }

        fn render(
            &self,
            _surface: &MockSurface,
            target: Dimensions,
        ) -> Result<MockSurface, RasterError> {
            self.operations.lock().unwrap().push(RecordedOp::Render {
                width: target.width,
                height: target.height,
            });
            if self.fail_render {
                return Err(RasterError::Render("mock render failure".to_string()));
            }
            Ok(MockSurface(target))
        }

        fn encode(
            &self,
            surface: &MockSurface,
            format: OutputFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, RasterError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: surface.0.width,
                height: surface.0.height,
                format,
                quality: quality.value(),
            });
            if self.fail_encode {
                return Err(RasterError::Encode("mock encode failure".to_string()));
            }
            let size = self
                .encoded_sizes
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| RasterError::Encode("no mock encode size".to_string()))?;
            Ok(vec![0u8; size])
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockRasterizer::decoding(800, 600);
        let registry = crate::imaging::HandleRegistry::new();
        let handle = registry.acquire(b"fake");

        let surface = backend.decode(&handle, MediaType::Jpeg).unwrap();
        assert_eq!(
            surface.dimensions(),
            Dimensions {
                width: 800,
                height: 600
            }
        );

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Decode {
                media_type: MediaType::Jpeg,
                bytes: 4
            }
        ));
    }

    #[test]
    fn mock_encode_sizes_in_order() {
        let backend = MockRasterizer::decoding(10, 10).with_encoded_sizes(vec![5, 3]);
        let surface = MockSurface(Dimensions {
            width: 10,
            height: 10,
        });

        let first = backend
            .encode(&surface, OutputFormat::Jpeg, Quality::FIRST_PASS)
            .unwrap();
        let second = backend
            .encode(&surface, OutputFormat::Jpeg, Quality::RETRY)
            .unwrap();
        assert_eq!((first.len(), second.len()), (5, 3));
        assert_eq!(backend.encode_qualities(), vec![85, 60]);
    }

    #[test]
    fn dimensions_display_and_longer_side() {
        let dims = Dimensions {
            width: 300,
            height: 1200,
        };
        assert_eq!(dims.to_string(), "300x1200");
        assert_eq!(dims.longer_side(), 1200);
    }
}
