//! Self-reflection analysis prompt.

use super::personalization_context;
use crate::storage::{PersonalizationSettings, SelfReflection};

/// Prompt asking for an analysis of a reflection entry.
#[must_use]
pub fn reflection_analysis_prompt(
    reflection: &SelfReflection,
    settings: &PersonalizationSettings,
) -> String {
    format!(
        r#"A person has written a private reflection about how they feel. Respond as a caring companion offering Islamic perspective and comfort.

Mood: {mood} (intensity {intensity}/10)
Reflection:
{content}

About them:
{context}

Respond with a JSON object in this exact format:
{{
  "summary": "One or two sentences acknowledging what they shared",
  "islamic_perspective": "How the Quran and Sunnah speak to this feeling",
  "verses": [
    {{"reference": "2:286", "text": "Translation of the verse"}}
  ],
  "hadith": "One relevant authentic hadith with its collection, or null",
  "dua": "A short supplication suited to the situation, or null",
  "practical_steps": ["Small, concrete step", "Another step"]
}}

Important:
- Include one to three verses and two to four practical steps
- Never diagnose; if the reflection mentions self-harm, gently urge contacting a trusted person or professional help"#,
        mood = reflection.mood.as_str(),
        intensity = reflection.intensity,
        content = reflection.content,
        context = personalization_context(settings),
    )
}
