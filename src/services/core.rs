//! Shared service helpers.
//!
//! - JSON extraction from model responses
//! - Input validation
//! - Identifier generation
//! - [`ask_model`]: one prompt in, one parsed JSON object out

use serde::de::DeserializeOwned;

use crate::error::ServiceError;
use crate::prompts::SYSTEM_PROMPT;
use crate::traits::{AnthropicClientTrait, CompletionConfig, Message};

/// Extract JSON from a model response, handling multiple formats.
///
/// Models may return JSON in different ways:
/// 1. Raw JSON (ideal case)
/// 2. JSON wrapped in markdown json code blocks
/// 3. JSON wrapped in generic markdown code blocks
/// 4. JSON embedded in surrounding prose
///
/// # Errors
///
/// Returns `ServiceError::JsonParseFailed` if no valid JSON can be extracted.
///
/// # Examples
///
/// ```
/// use barakah::services::extract_json;
///
/// let json = extract_json(r#"{"key": "value"}"#).unwrap();
/// assert_eq!(json["key"], "value");
///
/// let json = extract_json("```json\n{\"key\": \"value\"}\n```").unwrap();
/// assert_eq!(json["key"], "value");
///
/// assert!(extract_json("not json").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<serde_json::Value, ServiceError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```json") {
        return parse_json_with_context(&json_str, text);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```") {
        return parse_json_with_context(&json_str, text);
    }

    if let Some(json_str) = find_json_in_text(trimmed) {
        return parse_json_with_context(&json_str, text);
    }

    let preview = truncate_for_preview(text, 100);
    Err(ServiceError::JsonParseFailed {
        message: format!("No valid JSON found in response: {preview}"),
    })
}

/// Extract content from a code block with the given prefix.
fn extract_from_code_block(text: &str, prefix: &str) -> Option<String> {
    let start_idx = text.find(prefix)?;
    let remaining = text[start_idx + prefix.len()..].trim_start();

    let end_idx = remaining.find("```")?;
    let json_str = remaining[..end_idx].trim();

    if json_str.is_empty() {
        return None;
    }

    Some(json_str.to_string())
}

/// Find a JSON object or array anywhere in the text.
fn find_json_in_text(text: &str) -> Option<String> {
    extract_balanced(text, '{', '}').or_else(|| extract_balanced(text, '[', ']'))
}

/// Extract content between balanced opening and closing characters.
fn extract_balanced(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if ch == '\\' && in_string {
            escape_next = true;
            continue;
        }
        if ch == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(text[start..=start + i].to_string());
            }
        }
    }

    None
}

fn parse_json_with_context(
    json_str: &str,
    original: &str,
) -> Result<serde_json::Value, ServiceError> {
    serde_json::from_str(json_str).map_err(|e| {
        let preview = truncate_for_preview(original, 100);
        ServiceError::JsonParseFailed {
            message: format!("Failed to parse JSON: {e}. Preview: {preview}"),
        }
    })
}

/// Truncate text to `max_chars` characters for error messages.
fn truncate_for_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Deserialize a model response into `T`.
///
/// # Errors
///
/// Returns `ServiceError::JsonParseFailed` when the response holds no JSON
/// or the JSON does not have the expected shape.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, ServiceError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| ServiceError::JsonParseFailed {
        message: format!("Unexpected response shape: {e}"),
    })
}

/// Send one prompt with the shared system prompt and parse the JSON reply.
///
/// # Errors
///
/// Propagates client failures and [`parse_model_json`] errors.
pub async fn ask_model<C, T>(client: &C, prompt: String, max_tokens: u32) -> Result<T, ServiceError>
where
    C: AnthropicClientTrait + ?Sized,
    T: DeserializeOwned,
{
    let config = CompletionConfig::new()
        .with_max_tokens(max_tokens)
        .with_temperature(0.7)
        .with_system_prompt(SYSTEM_PROMPT);

    let response = client.complete(vec![Message::user(prompt)], config).await?;

    tracing::debug!(
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "Model response received"
    );

    parse_model_json(&response.content)
}

/// Validate a required free-text field.
///
/// # Errors
///
/// Returns `ServiceError::MissingField` for blank input and
/// `ServiceError::InvalidValue` when longer than `max_chars` characters.
pub fn validate_text(field: &str, value: &str, max_chars: usize) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::MissingField {
            field: field.to_string(),
        });
    }
    let len = value.chars().count();
    if len > max_chars {
        return Err(ServiceError::invalid(
            field,
            format!("must be at most {max_chars} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Validate an optional free-text field's length.
///
/// # Errors
///
/// Returns `ServiceError::InvalidValue` when longer than `max_chars` characters.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ServiceError> {
    match value {
        Some(v) if v.chars().count() > max_chars => Err(ServiceError::invalid(
            field,
            format!("must be at most {max_chars} characters"),
        )),
        _ => Ok(()),
    }
}

/// Validate a list of short strings.
///
/// # Errors
///
/// Returns `ServiceError::InvalidValue` when there are more than `max_items`
/// entries or an entry is blank or longer than `max_chars`.
pub fn validate_list(
    field: &str,
    items: &[String],
    max_items: usize,
    max_chars: usize,
) -> Result<(), ServiceError> {
    if items.len() > max_items {
        return Err(ServiceError::invalid(
            field,
            format!("must have at most {max_items} entries, got {}", items.len()),
        ));
    }
    if items
        .iter()
        .any(|item| item.trim().is_empty() || item.chars().count() > max_chars)
    {
        return Err(ServiceError::invalid(
            field,
            format!("entries must be non-empty and at most {max_chars} characters"),
        ));
    }
    Ok(())
}

/// Generate a unique record ID.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
