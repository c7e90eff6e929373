//! Image generation request and response types.

use serde::{Deserialize, Serialize};

/// Square card size requested for every image.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Body of an `images/generations` request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageRequest {
    /// Image model.
    pub model: String,
    /// Text prompt.
    pub prompt: String,
    /// Output size, e.g. `1024x1024`.
    pub size: String,
    /// Number of images.
    pub n: u32,
    /// `url` or `b64_json`.
    pub response_format: String,
}

impl ImageRequest {
    /// A single-image URL request at the default size.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
            n: 1,
            response_format: "url".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: String,
}

/// A generated image, as a hosted URL or inline base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Hosted image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    /// Prompt as rewritten by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
