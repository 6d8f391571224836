//! Shared test utilities: synthetic images in memory.
//!
//! Gradients compress well and noise compresses badly, which is all the
//! re-encode tests need to steer an encode over or under a byte budget.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

/// Smooth gradient, compresses well.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Deterministic xorshift noise, compresses badly.
pub fn noisy_rgb(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9E37_79B9;
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        };
        Rgb([next(), next(), next()])
    })
}

/// Encode a gradient as JPEG.
pub fn jpeg_bytes(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = gradient_rgb(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a gradient as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_rgb(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}
