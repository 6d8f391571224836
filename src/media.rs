//! Accepted upload media types.
//!
//! Uploads are identified by their declared MIME type, the same way a
//! browser fills `File.type` from the picker or the drag-and-drop payload.
//! When a file comes from disk instead, the type is inferred from the
//! extension with the table below.

use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// An image type the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

/// The allow-set, in display order.
pub const ACCEPTED_MEDIA_TYPES: &[MediaType] = &[
    MediaType::Jpeg,
    MediaType::Png,
    MediaType::Gif,
    MediaType::Webp,
];

/// Extension → media type, matched case-insensitively.
const EXTENSIONS: &[(&str, MediaType)] = &[
    ("jpg", MediaType::Jpeg),
    ("jpeg", MediaType::Jpeg),
    ("png", MediaType::Png),
    ("gif", MediaType::Gif),
    ("webp", MediaType::Webp),
];

impl MediaType {
    /// Parse a MIME string. Matching is exact, as browsers report `File.type`
    /// in lowercase without parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        ACCEPTED_MEDIA_TYPES
            .iter()
            .copied()
            .find(|t| t.as_mime() == mime)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, t)| *t)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::Webp => "image/webp",
        }
    }

    /// Preferred file extension.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Gif => "gif",
            MediaType::Webp => "webp",
        }
    }

    /// Short label for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Jpeg => "JPG",
            MediaType::Png => "PNG",
            MediaType::Gif => "GIF",
            MediaType::Webp => "WebP",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            MediaType::Jpeg => ImageFormat::Jpeg,
            MediaType::Png => ImageFormat::Png,
            MediaType::Gif => ImageFormat::Gif,
            MediaType::Webp => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Comma-separated labels of the allow-set, e.g. `JPG, PNG, GIF, WebP`.
pub fn accepted_labels() -> String {
    ACCEPTED_MEDIA_TYPES
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ")
}
