//! Growth plan drafting prompt.

use super::personalization_context;
use crate::storage::{FocusArea, PersonalizationSettings};

/// Prompt asking for a draft growth plan.
#[must_use]
pub fn growth_plan_prompt(
    focus_area: FocusArea,
    notes: Option<&str>,
    settings: &PersonalizationSettings,
) -> String {
    let notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(String::new, |n| format!("\nTheir own notes:\n{n}\n"));

    format!(
        r#"Draft a personal spiritual growth plan focused on {focus}.

About the person:
{context}
{notes}
Respond with a JSON object in this exact format:
{{
  "title": "Short plan title",
  "description": "Two or three sentences on the intention behind the plan",
  "goals": ["First measurable goal", "Second measurable goal", "Third measurable goal"]
}}

Important:
- Give between 3 and 7 goals, ordered from easiest to hardest
- Each goal must be specific and achievable within a few weeks
- Keep the plan realistic for the person's level"#,
        focus = focus_area.as_str(),
        context = personalization_context(settings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_notes() {
        let settings = PersonalizationSettings::defaults_for("u-1");
        let prompt = growth_plan_prompt(FocusArea::Quran, Some(" memorise Juz Amma "), &settings);
        assert!(prompt.contains("focused on quran"));
        assert!(prompt.contains("Their own notes:\nmemorise Juz Amma"));
        assert!(prompt.contains("between 3 and 7 goals"));
    }

    #[test]
    fn test_prompt_blank_notes_omitted() {
        let settings = PersonalizationSettings::defaults_for("u-1");
        let prompt = growth_plan_prompt(FocusArea::Dhikr, Some("   "), &settings);
        assert!(!prompt.contains("Their own notes"));
    }
}
