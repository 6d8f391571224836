//! Transport encoding for prepared images.
//!
//! The generation backend takes images as bare base64 strings inside JSON
//! bodies. This module turns a [`PreparedFile`] into those bodies. It does
//! no network I/O; sending the request is the caller's business.

use crate::upload::PreparedFile;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

fn success() -> String {
    "success".to_string()
}

/// Base64 of the file bytes, standard alphabet, without a `data:` prefix.
pub fn to_base64(file: &PreparedFile) -> String {
    STANDARD.encode(&file.bytes)
}

/// `data:<type>;base64,<data>` URL, for previews.
pub fn to_data_url(file: &PreparedFile) -> String {
    format!("data:{};base64,{}", file.media_type, to_base64(file))
}

/// Output resolution requested from the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

/// How much detail product recognition should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizeMode {
    #[default]
    Simple,
    Detailed,
}

/// Body of a competitor-image analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub image: String,
}

impl AnalyzeRequest {
    pub fn new(file: &PreparedFile) -> Self {
        Self {
            image: to_base64(file),
        }
    }
}

/// Composition prompt returned by competitor-image analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub prompt: String,
    #[serde(default = "success")]
    pub status: String,
}

/// Body of a product recognition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizeProductRequest {
    pub image: String,
    #[serde(default)]
    pub mode: RecognizeMode,
}

impl RecognizeProductRequest {
    pub fn new(file: &PreparedFile, mode: RecognizeMode) -> Self {
        Self {
            image: to_base64(file),
            mode,
        }
    }
}

/// Product description returned by recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizeProductResponse {
    pub product_info: String,
    #[serde(default = "success")]
    pub status: String,
}

/// Body of an image generation request.
///
/// Without a target image the backend runs text-to-image; with one it runs
/// image-to-image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_image: Option<String>,
    pub prompt: String,
    pub aspect_ratio: String,
    #[serde(default)]
    pub image_size: ImageSize,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            target_image: None,
            prompt: prompt.into(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            image_size: ImageSize::default(),
        }
    }

    pub fn with_target(self, file: &PreparedFile) -> Self {
        Self {
            target_image: Some(to_base64(file)),
            ..self
        }
    }

    pub fn with_aspect_ratio(self, aspect_ratio: impl Into<String>) -> Self {
        Self {
            aspect_ratio: aspect_ratio.into(),
            ..self
        }
    }

    pub fn with_image_size(self, image_size: ImageSize) -> Self {
        Self { image_size, ..self }
    }
}

/// Generation result as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub generated_image: String,
    #[serde(default = "success")]
    pub status: String,
}

impl GenerateResponse {
    /// Decoded image bytes.
    pub fn image_bytes(&self) -> Result<Vec<u8>, TransportError> {
        Ok(STANDARD.decode(self.generated_image.trim())?)
    }
}
