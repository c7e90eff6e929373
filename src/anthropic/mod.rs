//! Anthropic API client.
//!
//! This module provides:
//! - Direct Claude Messages API integration
//! - One upstream attempt per request, with no retry policy
//! - Request size validation
//!
//! Every AI feature of the service (insights, reflection analysis, growth
//! plan drafts, daily reminders) goes through [`AnthropicClient`], usually
//! behind the [`AnthropicClientTrait`](crate::traits::AnthropicClientTrait)
//! seam so services can be tested with mocks.

mod client;
mod config;
mod types;

pub use client::{AnthropicClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS,
};
pub use types::{ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock, ModelReply};
