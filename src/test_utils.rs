//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Canned Anthropic client mocks
//! - Fixed clocks
//! - Record fixtures
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ServiceError;
use crate::storage::{PersonalizationSettings, SpiritualLevel};
use crate::traits::{CompletionResponse, MockAnthropicClientTrait, MockTimeProvider, Usage};

/// Create a mock Anthropic client that always answers with `response`.
#[must_use]
pub fn mock_anthropic_success(
    response: impl Into<String>,
    input_tokens: u32,
    output_tokens: u32,
) -> MockAnthropicClientTrait {
    let response = response.into();
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete().returning(move |_msgs, _config| {
        Ok(CompletionResponse::new(
            response.clone(),
            Usage::new(input_tokens, output_tokens),
        ))
    });
    mock
}

/// Create a mock Anthropic client that always fails with `error`.
#[must_use]
pub fn mock_anthropic_error(error: ServiceError) -> MockAnthropicClientTrait {
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete()
        .returning(move |_msgs, _config| Err(error.clone()));
    mock
}

/// Create a clock frozen at `time`.
#[must_use]
pub fn mock_time(time: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().returning(move || time);
    mock
}

/// Create a clock frozen at an RFC 3339 timestamp.
///
/// # Panics
///
/// Panics if the timestamp is invalid.
#[must_use]
pub fn mock_time_str(timestamp: &str) -> MockTimeProvider {
    let time = DateTime::parse_from_rfc3339(timestamp)
        .expect("Invalid timestamp")
        .with_timezone(&Utc);
    mock_time(time)
}

/// Shorthand for a valid date.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Settings of an intermediate user with a name and interests.
#[must_use]
pub fn test_settings(user_id: &str) -> PersonalizationSettings {
    let mut settings = PersonalizationSettings::defaults_for(user_id);
    settings.display_name = Some("Amina".to_string());
    settings.spiritual_level = SpiritualLevel::Intermediate;
    settings.interests = vec!["tafsir".to_string(), "dhikr".to_string()];
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{AnthropicClientTrait, CompletionConfig, Message, TimeProvider};

    #[tokio::test]
    async fn test_mock_anthropic_success() {
        let mock = mock_anthropic_success("Hello!", 10, 20);
        let result = mock
            .complete(vec![Message::user("Hi")], CompletionConfig::new())
            .await
            .unwrap();
        assert_eq!(result.content, "Hello!");
        assert_eq!(result.usage.total(), 30);
    }

    #[tokio::test]
    async fn test_mock_anthropic_error() {
        let mock = mock_anthropic_error(ServiceError::Timeout { elapsed_ms: 5 });
        let err = mock
            .complete(vec![Message::user("Hi")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Timeout { elapsed_ms: 5 });
    }

    #[test]
    fn test_mock_time_str() {
        let clock = mock_time_str("2024-03-11T08:00:00Z");
        assert_eq!(clock.now().date_naive(), date(2024, 3, 11));
    }

    #[test]
    fn test_settings_fixture() {
        let settings = test_settings("u-1");
        assert_eq!(settings.user_id, "u-1");
        assert_eq!(settings.spiritual_level, SpiritualLevel::Intermediate);
    }
}
