//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Scale `source` so that it fits inside a `max_dimension` square.
///
/// Images already within bounds are returned unchanged. Otherwise both sides
/// are scaled uniformly so the longer side equals `max_dimension` exactly and
/// the shorter side is rounded to the nearest pixel (never below 1).
///
/// # Examples
/// ```
/// # use shotprep::imaging::{Dimensions, fit_within};
/// let fitted = fit_within(Dimensions { width: 3000, height: 1500 }, 2048);
/// assert_eq!(fitted, Dimensions { width: 2048, height: 1024 });
/// ```
pub fn fit_within(source: Dimensions, max_dimension: u32) -> Dimensions {
    let Dimensions { width, height } = source;

    if width <= max_dimension && height <= max_dimension {
        return source;
    }

    if width >= height {
        // Landscape or square: width is the long side
        let ratio = max_dimension as f64 / width as f64;
        Dimensions {
            width: max_dimension,
            height: scale_side(height, ratio),
        }
    } else {
        // Portrait
        let ratio = max_dimension as f64 / height as f64;
        Dimensions {
            width: scale_side(width, ratio),
            height: max_dimension,
        }
    }
}

fn scale_side(side: u32, ratio: f64) -> u32 {
    ((side as f64 * ratio).round() as u32).max(1)
}
