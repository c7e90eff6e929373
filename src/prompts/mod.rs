//! Prompt templates.
//!
//! Every model call uses [`SYSTEM_PROMPT`] plus one of the task templates:
//! - `insights`: Quran verse and hadith reflections, insight card images
//! - `reflection`: analysis of a self-reflection entry
//! - `growth`: growth plan drafting
//! - `reminder`: the short daily reminder
//!
//! Templates ask for JSON where the caller parses structured output.
//!
//! # Example
//!
//! ```
//! use barakah::prompts::{reminder_prompt, SYSTEM_PROMPT};
//! use barakah::storage::PersonalizationSettings;
//!
//! let settings = PersonalizationSettings::defaults_for("u-1");
//! let prompt = reminder_prompt(&settings, "2 Ramadan 1445 AH");
//! assert!(prompt.contains("Ramadan"));
//! assert!(SYSTEM_PROMPT.contains("Islamic"));
//! ```

mod growth;
mod insights;
mod reflection;
mod reminder;

pub use growth::growth_plan_prompt;
pub use insights::{hadith_insight_prompt, insight_image_prompt, verse_insight_prompt};
pub use reflection::reflection_analysis_prompt;
pub use reminder::{fallback_reminder, reminder_prompt, FALLBACK_REMINDERS};

use crate::storage::PersonalizationSettings;

/// Shared system prompt.
pub const SYSTEM_PROMPT: &str = "You are a gentle, knowledgeable Islamic companion. \
Ground what you say in the Quran and authentic hadith, cite references precisely, \
and never invent sources. Be warm, practical and concise. Do not issue legal \
rulings (fatwas); suggest consulting a qualified scholar for such questions.";

/// Describe the user's settings for inclusion in a prompt.
#[must_use]
pub fn personalization_context(settings: &PersonalizationSettings) -> String {
    let mut lines = vec![
        format!("Spiritual level: {}", settings.spiritual_level.as_str()),
        format!("Preferred language: {}", settings.preferred_language),
    ];
    if let Some(name) = &settings.display_name {
        lines.push(format!("Name: {name}"));
    }
    if !settings.interests.is_empty() {
        lines.push(format!("Interests: {}", settings.interests.join(", ")));
    }
    if !settings.goals.is_empty() {
        lines.push(format!("Personal goals: {}", settings.goals.join(", ")));
    }
    lines.join("\n")
}
