//! Anthropic Messages API request and response types.

#![allow(clippy::missing_const_for_fn)]

use serde::{Deserialize, Serialize};

/// Request to the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest {
    /// Model identifier (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for sampling (0.0-1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation messages.
    pub messages: Vec<ApiMessage>,
}

impl ApiRequest {
    /// Create a new API request with required fields.
    #[must_use]
    pub fn new(model: impl Into<String>, max_tokens: u32, messages: Vec<ApiMessage>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature: None,
            system: None,
            messages,
        }
    }

    /// Set temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ApiMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from the Anthropic Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Unique message ID.
    pub id: String,
    /// Content blocks in the response.
    pub content: Vec<ContentBlock>,
    /// Model used.
    pub model: String,
    /// Token usage.
    pub usage: ApiUsage,
    /// Reason the response stopped.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Content block in an API response.
///
/// Only text blocks are consumed; any other block type is skipped.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// Block types this service does not request.
    #[serde(other)]
    Unsupported,
}

/// Token usage in API response.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub struct ApiUsage {
    /// Input tokens consumed.
    pub input_tokens: u32,
    /// Output tokens generated.
    pub output_tokens: u32,
}

/// Concatenated text of a completed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// Text blocks joined with newlines.
    pub text: String,
    /// Token usage.
    pub usage: ApiUsage,
    /// Stop reason reported by the API.
    pub stop_reason: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_skips_unset_fields() {
        let request = ApiRequest::new("claude-test", 512, vec![ApiMessage::user("Salam")]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "claude-test");
        assert_eq!(value["max_tokens"], 512);
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("temperature").is_none());
        assert!(value.get("system").is_none());
    }

    #[test]
    fn test_request_with_system_and_temperature() {
        let request = ApiRequest::new("m", 10, vec![])
            .with_system("You are gentle.")
            .with_temperature(0.4);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["system"], "You are gentle.");
        assert_eq!(value["temperature"], 0.4);
    }

    #[test]
    fn test_response_ignores_unknown_blocks() {
        let body = json!({
            "id": "msg_1",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Alhamdulillah"}
            ],
            "model": "claude-test",
            "usage": {"input_tokens": 3, "output_tokens": 4},
            "stop_reason": "end_turn"
        });

        let response: ApiResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.content[0], ContentBlock::Unsupported);
        assert_eq!(
            response.content[1],
            ContentBlock::Text {
                text: "Alhamdulillah".to_string()
            }
        );
        assert_eq!(response.usage.output_tokens, 4);
    }
}
