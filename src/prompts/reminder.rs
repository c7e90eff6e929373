//! Daily reminder prompt and canned fallbacks.

use chrono::{Datelike, NaiveDate};

use super::personalization_context;
use crate::storage::PersonalizationSettings;

/// Reminders served when the model is slow or unavailable.
pub const FALLBACK_REMINDERS: [&str; 7] = [
    "\"Verily, in the remembrance of Allah do hearts find rest.\" (Quran 13:28) Take a quiet minute for dhikr today.",
    "\"The most beloved deeds to Allah are those done consistently, even if small.\" (Bukhari) Choose one small good deed and keep it.",
    "\"Indeed, with hardship comes ease.\" (Quran 94:6) Whatever you carry today, you are not carrying it alone.",
    "\"Smiling in the face of your brother is charity.\" (Tirmidhi) Let someone see your kindness today.",
    "\"So remember Me; I will remember you.\" (Quran 2:152) Say SubhanAllah, Alhamdulillah and Allahu Akbar before you sleep.",
    "\"Allah does not burden a soul beyond that it can bear.\" (Quran 2:286) Be gentle with yourself today.",
    "\"Whoever believes in Allah and the Last Day, let him speak good or remain silent.\" (Bukhari) Guard your words today.",
];

/// Canned reminder for a day, rotating through [`FALLBACK_REMINDERS`].
#[must_use]
pub fn fallback_reminder(date: NaiveDate) -> &'static str {
    let index = date.ordinal0() as usize % FALLBACK_REMINDERS.len();
    FALLBACK_REMINDERS[index]
}

/// Prompt asking for today's short reminder.
#[must_use]
pub fn reminder_prompt(settings: &PersonalizationSettings, hijri_today: &str) -> String {
    format!(
        r"Write today's short spiritual reminder.

Today is {hijri_today}.

About the reader:
{context}

Important:
- Two or three sentences, plain text, no JSON or markdown
- Anchor it in one verse or authentic hadith and name the source
- If today is a notable date in the Islamic calendar, mention it",
        context = personalization_context(settings),
    )
}
