//! Domain services.
//!
//! Each service validates input, talks to storage and the external
//! providers through the traits in [`crate::traits`], and logs what it did.
//! Services hold their dependencies in `Arc`s and are generic over the
//! traits, so tests run them against mocks:
//!
//! - [`InsightService`]: Quran and hadith insights, insight card images
//! - [`ReflectionService`]: self-reflection entries and their AI analysis
//! - [`GrowthPlanService`]: growth plans, goal progress, AI drafts
//! - [`PersonalizationService`]: per-user settings
//! - [`LearningService`]: the shared learning library
//! - [`HabitService`]: habits, check-ins and streaks
//!
//! # Example
//!
//! ```
//! use barakah::services::compute_stats;
//! use barakah::storage::HabitLog;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
//! let logs = vec![
//!     HabitLog::new("h-1", today.pred_opt().unwrap(), 1),
//!     HabitLog::new("h-1", today, 1),
//! ];
//! let stats = compute_stats("h-1", &logs, 1, today);
//! assert_eq!(stats.current_streak, 2);
//! ```

mod core;
mod growth_plans;
mod habits;
mod insights;
mod learning;
mod personalization;
mod reflections;

pub use core::{
    ask_model, extract_json, generate_id, parse_model_json, validate_list, validate_optional_text,
    validate_text,
};
pub use growth_plans::{
    apply_goal_completion, GeneratePlanRequest, GrowthPlanInput, GrowthPlanPatch,
    GrowthPlanService, GrowthPlanView,
};
pub use habits::{compute_stats, HabitService, HabitStats, HabitUpdate, NewHabit};
pub use insights::{daily_verse_number, HadithInsight, InsightService, QuranInsight};
pub use learning::{LearningInput, LearningQuery, LearningService};
pub use personalization::{
    settings_for, validate_reminder_time, validate_settings, PersonalizationService,
    SettingsInput, SettingsPatch,
};
pub use reflections::{
    summarize_moods, MoodCount, MoodSummary, NewReflection, ReflectionService, ReflectionUpdate,
};
