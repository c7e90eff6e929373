//! AI devotional insights.
//!
//! A Quran insight pairs a verse (fetched from the Quran text API in Arabic
//! and the reader's translation) with a model-written reflection. Hadith
//! insights come entirely from the model. Insight cards are rendered by the
//! optional image client.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::core::{ask_model, validate_text};
use crate::error::{ImageError, ServiceError};
use crate::image::{GeneratedImage, MAX_PROMPT_LENGTH};
use crate::prompts::{hadith_insight_prompt, insight_image_prompt, verse_insight_prompt};
use crate::quran::{Verse, TOTAL_VERSES};
use crate::storage::PersonalizationSettings;
use crate::traits::{AnthropicClientTrait, ImageClientTrait, QuranClientTrait};

/// Longest accepted hadith topic.
pub const MAX_TOPIC_LENGTH: usize = 200;

/// Stride through the verses, coprime with [`TOTAL_VERSES`].
const VERSE_STRIDE: i64 = 7_919;

/// Verse number (1-6236) shown on `date`.
///
/// Consecutive days land far apart in the text and every verse is visited
/// once per 6236 days.
///
/// ```
/// use barakah::services::daily_verse_number;
/// use chrono::NaiveDate;
///
/// let n = daily_verse_number(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
/// assert!((1..=6236).contains(&n));
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn daily_verse_number(date: NaiveDate) -> u32 {
    let day = i64::from(date.num_days_from_ce());
    (day * VERSE_STRIDE).rem_euclid(i64::from(TOTAL_VERSES)) as u32 + 1
}

#[derive(Debug, Deserialize)]
struct ReflectionReply {
    title: String,
    reflection: String,
    #[serde(default)]
    practical_action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HadithReply {
    hadith: String,
    #[serde(default)]
    narrator: Option<String>,
    collection: String,
    #[serde(default)]
    reference: Option<String>,
    title: String,
    reflection: String,
    #[serde(default)]
    practical_action: Option<String>,
}

/// A verse with a reflection on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuranInsight {
    /// The verse in Arabic and translation.
    pub verse: Verse,
    /// Reflection title.
    pub title: String,
    /// Reflection text.
    pub reflection: String,
    /// Suggested action for today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practical_action: Option<String>,
}

/// A hadith with a reflection on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HadithInsight {
    /// Requested topic.
    pub topic: String,
    /// Hadith text in English.
    pub hadith: String,
    /// Narrating companion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrator: Option<String>,
    /// Collection, e.g. `Sahih Muslim`.
    pub collection: String,
    /// Book and number within the collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Reflection title.
    pub title: String,
    /// Reflection text.
    pub reflection: String,
    /// Suggested action for today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practical_action: Option<String>,
}

/// Devotional insight service.
pub struct InsightService<C, Q, I>
where
    C: AnthropicClientTrait,
    Q: QuranClientTrait,
    I: ImageClientTrait,
{
    client: Arc<C>,
    quran: Arc<Q>,
    image: Option<Arc<I>>,
}

impl<C, Q, I> InsightService<C, Q, I>
where
    C: AnthropicClientTrait,
    Q: QuranClientTrait,
    I: ImageClientTrait,
{
    /// Create an insight service; `image` is `None` when image generation
    /// is not configured.
    #[must_use]
    pub const fn new(client: Arc<C>, quran: Arc<Q>, image: Option<Arc<I>>) -> Self {
        Self {
            client,
            quran,
            image,
        }
    }

    /// Insight on the verse of the day.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ApiUnavailable`] when the Quran API or the
    /// model fails, or [`ServiceError::JsonParseFailed`] for a malformed reply.
    pub async fn quran_insight(
        &self,
        date: NaiveDate,
        settings: &PersonalizationSettings,
    ) -> Result<QuranInsight, ServiceError> {
        let number = daily_verse_number(date).to_string();
        tracing::debug!(date = %date, verse = %number, "Verse of the day");
        self.verse_insight(&number, settings).await
    }

    /// Insight on an explicit verse.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a malformed reference,
    /// [`ServiceError::NotFound`] for a verse that does not exist, and the
    /// errors of [`Self::quran_insight`].
    pub async fn verse_insight(
        &self,
        reference: &str,
        settings: &PersonalizationSettings,
    ) -> Result<QuranInsight, ServiceError> {
        let verse = self
            .quran
            .fetch_verse(reference, &settings.translation_edition)
            .await?;

        let reply: ReflectionReply =
            ask_model(self.client.as_ref(), verse_insight_prompt(&verse, settings), 1_200).await?;

        tracing::info!(verse = %verse.reference, "Generated Quran insight");

        Ok(QuranInsight {
            verse,
            title: reply.title,
            reflection: reply.reflection,
            practical_action: reply.practical_action,
        })
    }

    /// Hadith on `topic` with a reflection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingField`] / [`ServiceError::InvalidValue`]
    /// for a blank or overlong topic, and model errors otherwise.
    pub async fn hadith_insight(
        &self,
        topic: &str,
        settings: &PersonalizationSettings,
    ) -> Result<HadithInsight, ServiceError> {
        validate_text("topic", topic, MAX_TOPIC_LENGTH)?;
        let topic = topic.trim();

        let reply: HadithReply =
            ask_model(self.client.as_ref(), hadith_insight_prompt(topic, settings), 1_200).await?;

        tracing::info!(topic = %topic, collection = %reply.collection, "Generated hadith insight");

        Ok(HadithInsight {
            topic: topic.to_string(),
            hadith: reply.hadith,
            narrator: reply.narrator,
            collection: reply.collection,
            reference: reply.reference,
            title: reply.title,
            reflection: reply.reflection,
            practical_action: reply.practical_action,
        })
    }

    /// Render an insight card image.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ApiUnavailable`] when no image client is
    /// configured or the provider fails, and [`ServiceError::InvalidValue`]
    /// for a rejected prompt.
    pub async fn insight_image(&self, prompt: &str) -> Result<GeneratedImage, ServiceError> {
        let image = self.image.as_ref().ok_or(ImageError::NotConfigured)?;
        validate_text("prompt", prompt, MAX_PROMPT_LENGTH / 2)?;

        let generated = image.generate(&insight_image_prompt(prompt)).await?;
        tracing::info!(hosted = generated.url.is_some(), "Generated insight image");
        Ok(generated)
    }
}

impl<C, Q, I> std::fmt::Debug for InsightService<C, Q, I>
where
    C: AnthropicClientTrait,
    Q: QuranClientTrait,
    I: ImageClientTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightService")
            .field("client", &"<AnthropicClientTrait>")
            .field("quran", &"<QuranClientTrait>")
            .field("image_enabled", &self.image.is_some())
            .finish()
    }
}
