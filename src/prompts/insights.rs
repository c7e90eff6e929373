//! Devotional insight prompts.

use super::personalization_context;
use crate::quran::Verse;
use crate::storage::PersonalizationSettings;

/// Prompt asking for a reflection on one verse.
#[must_use]
pub fn verse_insight_prompt(verse: &Verse, settings: &PersonalizationSettings) -> String {
    format!(
        r#"Write a short reflection on this verse of the Quran for the reader described below.

Verse {reference} ({surah}):
Arabic: {arabic}
Translation ({edition}): {translation}

Reader:
{context}

Respond with a JSON object in this exact format:
{{
  "title": "A short title for the reflection",
  "reflection": "Two or three paragraphs connecting the verse to daily life",
  "practical_action": "One concrete thing to do today"
}}

Important:
- Quote only the verse given above
- Match the depth of the reflection to the reader's level"#,
        reference = verse.reference,
        surah = verse.surah_name,
        arabic = verse.arabic,
        edition = verse.translation_edition,
        translation = verse.translation,
        context = personalization_context(settings),
    )
}

/// Prompt asking for a well-known hadith on a topic with a reflection.
#[must_use]
pub fn hadith_insight_prompt(topic: &str, settings: &PersonalizationSettings) -> String {
    format!(
        r#"Share one authentic, well-known hadith about "{topic}" and reflect on it for the reader described below.

Reader:
{context}

Respond with a JSON object in this exact format:
{{
  "hadith": "The text of the hadith in English",
  "narrator": "The companion who narrated it",
  "collection": "Sahih al-Bukhari",
  "reference": "Book and number within the collection",
  "title": "A short title for the reflection",
  "reflection": "One or two paragraphs on its meaning today",
  "practical_action": "One concrete thing to do today"
}}

Important:
- Only use hadith graded sahih or hasan from the major collections
- If you are unsure of the exact reference, choose a different hadith"#,
        context = personalization_context(settings),
    )
}

/// Prompt sent to the image model for an insight card.
#[must_use]
pub fn insight_image_prompt(text: &str) -> String {
    format!(
        "A serene illustrated card inspired by Islamic art: geometric patterns, \
soft light, natural scenery, no people, animals or faces, no written text. \
Theme: {}",
        text.trim()
    )
}
