//! HTTP client for the image generation API.

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{ErrorEnvelope, GeneratedImage, ImageRequest, ImageResponse};
use crate::config::{Config, SecretString};
use crate::error::ImageError;
use crate::traits::ImageClientTrait;

/// Longest prompt accepted before calling the provider.
pub const MAX_PROMPT_LENGTH: usize = 4_000;

/// OpenAI-compatible image generation client.
#[derive(Debug)]
pub struct ImageClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    timeout_ms: u64,
}

impl ImageClient {
    /// Create a new image client.
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ImageError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            timeout_ms,
        })
    }

    /// Build a client from the application config.
    ///
    /// Returns `Ok(None)` when no image key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ImageError> {
        config
            .image_api_key
            .clone()
            .map(|key| {
                Self::new(
                    key,
                    &config.image_base_url,
                    &config.image_model,
                    config.request_timeout_ms,
                )
            })
            .transpose()
    }

    /// Model used for generation.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate one image.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ImageError::InvalidRequest {
                message: "Prompt must not be empty".to_string(),
            });
        }
        if prompt.chars().count() > MAX_PROMPT_LENGTH {
            return Err(ImageError::InvalidRequest {
                message: format!("Prompt longer than {MAX_PROMPT_LENGTH} characters"),
            });
        }

        let url = format!("{}/images/generations", self.base_url);
        let request = ImageRequest::new(&self.model, prompt);
        let start = std::time::Instant::now();

        tracing::debug!(url = %url, model = %self.model, "Requesting image generation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ImageError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Image API response received"
        );

        match status.as_u16() {
            401 | 403 => return Err(ImageError::AuthenticationFailed),
            429 => return Err(ImageError::RateLimited),
            400 => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .map_or(body, |envelope| envelope.error.message);
                return Err(ImageError::InvalidRequest { message });
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        let body: ImageResponse =
            response
                .json()
                .await
                .map_err(|e| ImageError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                })?;

        body.data
            .into_iter()
            .find(|image| image.url.is_some() || image.b64_json.is_some())
            .ok_or_else(|| ImageError::UnexpectedResponse {
                message: "No image in response".to_string(),
            })
    }
}

#[async_trait]
impl ImageClientTrait for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.generate_image(prompt).await
    }
}
