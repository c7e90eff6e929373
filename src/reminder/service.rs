//! Daily reminder generation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cache::ReminderCache;
use crate::calendar::convert_with_adjustment;
use crate::prompts::{fallback_reminder, reminder_prompt, SYSTEM_PROMPT};
use crate::storage::PersonalizationSettings;
use crate::traits::{AnthropicClientTrait, CompletionConfig, Message};

/// Where a reminder came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderSource {
    /// Served from the cache.
    Cache,
    /// Freshly generated by the model.
    Model,
    /// Canned text; the model was slow or failed.
    Fallback,
}

/// A reminder as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReminder {
    /// Reminder text.
    pub text: String,
    /// Where it came from.
    pub source: ReminderSource,
    /// Hijri date the reminder was produced for.
    pub hijri_date: String,
    /// When this response was produced.
    pub generated_at: DateTime<Utc>,
}

/// Produces one reminder per session per day.
pub struct ReminderService<C>
where
    C: AnthropicClientTrait,
{
    client: Arc<C>,
    cache: Arc<ReminderCache>,
    timeout: Duration,
}

impl<C> ReminderService<C>
where
    C: AnthropicClientTrait,
{
    /// Create a reminder service; model calls are abandoned after `timeout_ms`.
    #[must_use]
    pub const fn new(client: Arc<C>, cache: Arc<ReminderCache>, timeout_ms: u64) -> Self {
        Self {
            client,
            cache,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Today's reminder for `session`.
    ///
    /// A cached reminder is returned while it is fresh. Otherwise the model
    /// is asked; its answer is cached. A timeout or failure yields a canned
    /// reminder that is not cached, so the next request tries again.
    pub async fn daily_reminder(
        &self,
        session: &str,
        settings: &PersonalizationSettings,
    ) -> DailyReminder {
        let now = self.cache.now();
        let hijri = convert_with_adjustment(
            now.date_naive(),
            i64::from(settings.hijri_adjustment_days),
        )
        .to_string();

        if let Some(text) = self.cache.get(session) {
            tracing::debug!(session = %session, "Reminder cache hit");
            return DailyReminder {
                text,
                source: ReminderSource::Cache,
                hijri_date: hijri,
                generated_at: now,
            };
        }

        let config = CompletionConfig::new()
            .with_max_tokens(300)
            .with_temperature(0.8)
            .with_system_prompt(SYSTEM_PROMPT);
        let messages = vec![Message::user(reminder_prompt(settings, &hijri))];

        let outcome =
            tokio::time::timeout(self.timeout, self.client.complete(messages, config)).await;

        match outcome {
            Ok(Ok(response)) if !response.content.trim().is_empty() => {
                let text = response.content.trim().to_string();
                self.cache.put(session, text.clone());
                tracing::info!(session = %session, "Generated daily reminder");
                DailyReminder {
                    text,
                    source: ReminderSource::Model,
                    hijri_date: hijri,
                    generated_at: now,
                }
            }
            Ok(Ok(_)) => self.fallback(session, hijri, now, "empty model response"),
            Ok(Err(e)) => self.fallback(session, hijri, now, &e.to_string()),
            Err(_) => self.fallback(
                session,
                hijri,
                now,
                &format!("timed out after {}ms", self.timeout.as_millis()),
            ),
        }
    }

    fn fallback(
        &self,
        session: &str,
        hijri_date: String,
        now: DateTime<Utc>,
        reason: &str,
    ) -> DailyReminder {
        tracing::warn!(session = %session, reason = %reason, "Serving fallback reminder");
        DailyReminder {
            text: fallback_reminder(now.date_naive()).to_string(),
            source: ReminderSource::Fallback,
            hijri_date,
            generated_at: now,
        }
    }
}

impl<C> std::fmt::Debug for ReminderService<C>
where
    C: AnthropicClientTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderService")
            .field("client", &"<AnthropicClientTrait>")
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish()
    }
}
