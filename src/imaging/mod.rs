//! Image processing — pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` pinned to the declared media type |
//! | **Fit** | [`fit_within`]: longer side clamped, aspect ratio preserved |
//! | **Render** | Lanczos3 `resize_exact` |
//! | **Encode** | PNG (lossless) or JPEG at a given [`Quality`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality, output format and the encode budget
//! - **Handles**: Scoped decode handles released on drop
//! - **Backend**: [`Rasterizer`] trait + [`ImageRasterizer`]

pub mod backend;
mod calculations;
pub mod handle;
mod params;
pub mod rust_backend;

pub use backend::{Dimensions, RasterError, Rasterizer, Surface};
pub use calculations::fit_within;
pub use handle::{DecodeHandle, HandleRegistry};
pub use params::{DEFAULT_MAX_BYTES, DEFAULT_MAX_DIMENSION, EncodeBudget, OutputFormat, Quality};
pub use rust_backend::ImageRasterizer;
