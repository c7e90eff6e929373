//! Anthropic API client.
//!
//! This module provides:
//! - HTTP client for the Anthropic Messages API
//! - A single attempt per request; failures surface to the caller
//! - Request validation
//! - Response parsing

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::config::{ClientConfig, DEFAULT_MAX_TOKENS};
use super::types::{ApiMessage, ApiRequest, ApiResponse, ContentBlock, ModelReply};
use crate::error::{AnthropicError, ServiceError};
use crate::traits::{AnthropicClientTrait, CompletionConfig, CompletionResponse, Message, Usage};

/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 20;
/// Maximum content length per message (32KB).
pub const MAX_CONTENT_LENGTH: usize = 32_000;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AnthropicError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a client with default configuration.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AnthropicError> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a completion request. Each call makes exactly one upstream attempt.
    pub async fn send(&self, request: ApiRequest) -> Result<ModelReply, AnthropicError> {
        Self::validate_request(&request)?;
        self.execute(&request).await
    }

    /// Validate request size limits.
    fn validate_request(request: &ApiRequest) -> Result<(), AnthropicError> {
        if request.messages.is_empty() {
            return Err(AnthropicError::InvalidRequest {
                message: "At least one message is required".to_string(),
            });
        }

        if request.messages.len() > MAX_MESSAGES {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Too many messages: {} > {MAX_MESSAGES}",
                    request.messages.len()
                ),
            });
        }

        if let Some(msg) = request
            .messages
            .iter()
            .find(|m| m.content.len() > MAX_CONTENT_LENGTH)
        {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Message too large: {} > {MAX_CONTENT_LENGTH}",
                    msg.content.len()
                ),
            });
        }

        Ok(())
    }

    /// Execute the request.
    async fn execute(&self, request: &ApiRequest) -> Result<ModelReply, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            timeout_ms = self.config.timeout_ms,
            "Starting Anthropic API request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if e.is_timeout() {
                    tracing::error!(url = %url, elapsed_ms, "Anthropic API request timed out");
                    AnthropicError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::error!(
                        url = %url,
                        elapsed_ms,
                        error = %e,
                        "Anthropic API request failed"
                    );
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Anthropic API response received"
        );

        match status.as_u16() {
            401 => return Err(AnthropicError::AuthenticationFailed),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(AnthropicError::RateLimited {
                    retry_after_seconds: retry_after,
                });
            }
            529 => {
                return Err(AnthropicError::ModelOverloaded {
                    model: request.model.clone(),
                })
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnthropicError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        let body: ApiResponse =
            response
                .json()
                .await
                .map_err(|e| AnthropicError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                })?;

        Self::parse_response(body)
    }

    /// Join the text blocks of an API response.
    fn parse_response(response: ApiResponse) -> Result<ModelReply, AnthropicError> {
        let text = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Unsupported => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(AnthropicError::UnexpectedResponse {
                message: "No content in response".to_string(),
            });
        }

        Ok(ModelReply {
            text,
            usage: response.usage,
            stop_reason: response.stop_reason,
        })
    }
}

#[async_trait]
impl AnthropicClientTrait for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, ServiceError> {
        let api_messages: Vec<ApiMessage> = messages
            .into_iter()
            .map(|m| {
                if m.role == "assistant" {
                    ApiMessage::assistant(m.content)
                } else {
                    ApiMessage::user(m.content)
                }
            })
            .collect();

        let max_tokens = config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let mut request = ApiRequest::new(&self.config.model, max_tokens, api_messages);

        if let Some(temp) = config.temperature {
            request = request.with_temperature(f64::from(temp));
        }
        if let Some(system) = config.system_prompt {
            request = request.with_system(system);
        }

        let reply = self.send(request).await.map_err(|e| match e {
            AnthropicError::InvalidRequest { message } => ServiceError::InvalidValue {
                field: "content".to_string(),
                reason: message,
            },
            other => ServiceError::ApiUnavailable {
                message: other.to_string(),
            },
        })?;

        Ok(CompletionResponse::new(
            reply.text,
            Usage::new(reply.usage.input_tokens, reply.usage.output_tokens),
        ))
    }
}
