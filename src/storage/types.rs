//! Record types persisted by the storage layer.
//!
//! This module defines the user-scoped records stored in the database:
//! - [`SelfReflection`]: Mood entries with optional AI analysis
//! - [`GrowthPlan`]: Spiritual growth plans with goals
//! - [`PersonalizationSettings`]: Per-user preferences
//! - [`LearningContent`]: Shared learning library entries
//! - [`Habit`] and [`HabitLog`]: Habit definitions and daily check-ins
//!
//! Enum columns are stored as their lowercase `as_str` form.

#![allow(clippy::should_implement_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Mood reported with a self-reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Grateful.
    Grateful,
    /// Happy.
    Happy,
    /// Peaceful.
    Peaceful,
    /// Hopeful.
    Hopeful,
    /// Anxious.
    Anxious,
    /// Sad.
    Sad,
    /// Angry.
    Angry,
    /// Lonely.
    Lonely,
    /// Stressed.
    Stressed,
    /// Confused.
    Confused,
}

impl Mood {
    /// Every mood, in display order.
    pub const ALL: [Self; 10] = [
        Self::Grateful,
        Self::Happy,
        Self::Peaceful,
        Self::Hopeful,
        Self::Anxious,
        Self::Sad,
        Self::Angry,
        Self::Lonely,
        Self::Stressed,
        Self::Confused,
    ];

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grateful => "grateful",
            Self::Happy => "happy",
            Self::Peaceful => "peaceful",
            Self::Hopeful => "hopeful",
            Self::Anxious => "anxious",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Lonely => "lonely",
            Self::Stressed => "stressed",
            Self::Confused => "confused",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Progress of the AI analysis attached to a reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Analysis not produced yet.
    #[default]
    Pending,
    /// Analysis stored.
    Completed,
    /// The model call failed; the entry is kept without analysis.
    Failed,
}

impl AnalysisStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A verse cited by an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseCitation {
    /// `surah:ayah` reference.
    pub reference: String,
    /// Verse text or translation.
    pub text: String,
}

/// Structured AI analysis of a reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionAnalysis {
    /// Short empathetic summary of the entry.
    pub summary: String,
    /// How the feeling is viewed in Islamic teaching.
    pub islamic_perspective: String,
    /// Relevant verses.
    #[serde(default)]
    pub verses: Vec<VerseCitation>,
    /// A relevant hadith with its source.
    #[serde(default)]
    pub hadith: Option<String>,
    /// A supplication suited to the mood.
    #[serde(default)]
    pub dua: Option<String>,
    /// Concrete next steps.
    #[serde(default)]
    pub practical_steps: Vec<String>,
}

/// A mood-based self-reflection entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfReflection {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Reported mood.
    pub mood: Mood,
    /// Mood intensity (1-10).
    pub intensity: u8,
    /// Free-text entry.
    pub content: String,
    /// AI analysis, present when `analysis_status` is completed.
    pub analysis: Option<ReflectionAnalysis>,
    /// Analysis progress.
    pub analysis_status: AnalysisStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SelfReflection {
    /// Create a new pending reflection.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        mood: Mood,
        intensity: u8,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            mood,
            intensity,
            content: content.into(),
            analysis: None,
            analysis_status: AnalysisStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set creation and update timestamps.
    #[must_use]
    pub const fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }
}

/// Filter for listing reflections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionFilter {
    /// Maximum number of entries.
    pub limit: u32,
    /// Only entries with this mood.
    pub mood: Option<Mood>,
}

/// Lifecycle of a growth plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Drafted, not started.
    #[default]
    Draft,
    /// In progress.
    Active,
    /// Temporarily paused.
    Paused,
    /// All goals reached.
    Completed,
    /// Hidden from the active list.
    Archived,
}

impl PlanStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Area of practice a growth plan targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    /// Salah.
    Prayer,
    /// Recitation and study of the Quran.
    Quran,
    /// Remembrance.
    Dhikr,
    /// Akhlaq and manners.
    Character,
    /// Seeking knowledge.
    Knowledge,
    /// Sadaqah and zakat.
    Charity,
    /// Obligatory and voluntary fasts.
    Fasting,
    /// Family ties.
    Family,
}

impl FocusArea {
    /// Every focus area.
    pub const ALL: [Self; 8] = [
        Self::Prayer,
        Self::Quran,
        Self::Dhikr,
        Self::Character,
        Self::Knowledge,
        Self::Charity,
        Self::Fasting,
        Self::Family,
    ];

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prayer => "prayer",
            Self::Quran => "quran",
            Self::Dhikr => "dhikr",
            Self::Character => "character",
            Self::Knowledge => "knowledge",
            Self::Charity => "charity",
            Self::Fasting => "fasting",
            Self::Family => "family",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// A single goal inside a growth plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanGoal {
    /// What the user commits to.
    pub title: String,
    /// Whether the goal has been reached.
    #[serde(default)]
    pub completed: bool,
}

impl PlanGoal {
    /// Create an open goal.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

/// A personalized spiritual growth plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPlan {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Plan title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Targeted practice.
    pub focus_area: FocusArea,
    /// Lifecycle status.
    pub status: PlanStatus,
    /// Ordered goals.
    pub goals: Vec<PlanGoal>,
    /// Optional target date.
    pub target_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl GrowthPlan {
    /// Create a new draft plan.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        focus_area: FocusArea,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            description: String::new(),
            focus_area,
            status: PlanStatus::Draft,
            goals: Vec::new(),
            target_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set goals.
    #[must_use]
    pub fn with_goals(mut self, goals: Vec<PlanGoal>) -> Self {
        self.goals = goals;
        self
    }

    /// Set status.
    #[must_use]
    pub const fn with_status(mut self, status: PlanStatus) -> Self {
        self.status = status;
        self
    }

    /// Fraction of completed goals, 0.0 when the plan has none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.goals.is_empty() {
            return 0.0;
        }
        let done = self.goals.iter().filter(|g| g.completed).count();
        done as f64 / self.goals.len() as f64
    }
}

/// Self-assessed depth of practice, also used as content difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpiritualLevel {
    /// Starting out.
    #[default]
    Beginner,
    /// Regular practice.
    Intermediate,
    /// Deep study.
    Advanced,
}

impl SpiritualLevel {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Default interface language.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default Quran translation edition.
pub const DEFAULT_TRANSLATION: &str = "en.asad";

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizationSettings {
    /// Owning user (primary key).
    pub user_id: String,
    /// Name used in greetings.
    pub display_name: Option<String>,
    /// Interface language code.
    pub preferred_language: String,
    /// Quran translation edition identifier (e.g. `en.asad`).
    pub translation_edition: String,
    /// Self-assessed level.
    pub spiritual_level: SpiritualLevel,
    /// Topics of interest.
    pub interests: Vec<String>,
    /// Personal goals.
    pub goals: Vec<String>,
    /// Preferred reminder time, `HH:MM` 24h.
    pub reminder_time: Option<String>,
    /// Moon-sighting adjustment applied to Hijri dates (-2..=2).
    pub hijri_adjustment_days: i8,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PersonalizationSettings {
    /// Default settings for a user without a stored row.
    #[must_use]
    pub fn defaults_for(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            preferred_language: DEFAULT_LANGUAGE.to_string(),
            translation_edition: DEFAULT_TRANSLATION.to_string(),
            spiritual_level: SpiritualLevel::Beginner,
            interests: Vec::new(),
            goals: Vec::new(),
            reminder_time: None,
            hijri_adjustment_days: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Category of a learning library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    /// Quranic studies.
    Quran,
    /// Prophetic traditions.
    Hadith,
    /// Jurisprudence.
    Fiqh,
    /// Prophetic biography.
    Seerah,
    /// Supplications.
    Dua,
    /// Character and manners.
    Akhlaq,
}

impl ContentCategory {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quran => "quran",
            Self::Hadith => "hadith",
            Self::Fiqh => "fiqh",
            Self::Seerah => "seerah",
            Self::Dua => "dua",
            Self::Akhlaq => "akhlaq",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quran" => Some(Self::Quran),
            "hadith" => Some(Self::Hadith),
            "fiqh" => Some(Self::Fiqh),
            "seerah" => Some(Self::Seerah),
            "dua" => Some(Self::Dua),
            "akhlaq" => Some(Self::Akhlaq),
            _ => None,
        }
    }
}

/// Entry of the shared learning library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningContent {
    /// Unique identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: ContentCategory,
    /// Body text (markdown).
    pub body: String,
    /// Citation or author.
    pub source: Option<String>,
    /// Intended level.
    pub difficulty: SpiritualLevel,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Filter for listing learning content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LearningFilter {
    /// Only this category.
    pub category: Option<ContentCategory>,
    /// Only this difficulty.
    pub difficulty: Option<SpiritualLevel>,
    /// Case-insensitive match on title, body or tags.
    pub search: Option<String>,
    /// Maximum number of entries.
    pub limit: u32,
}

/// Kind of habit being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    /// Prayer related.
    Prayer,
    /// Quran reading.
    Quran,
    /// Remembrance.
    Dhikr,
    /// Giving.
    Charity,
    /// Fasting.
    Fasting,
    /// Anything else.
    #[default]
    Custom,
}

impl HabitCategory {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prayer => "prayer",
            Self::Quran => "quran",
            Self::Dhikr => "dhikr",
            Self::Charity => "charity",
            Self::Fasting => "fasting",
            Self::Custom => "custom",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "prayer" => Some(Self::Prayer),
            "quran" => Some(Self::Quran),
            "dhikr" => Some(Self::Dhikr),
            "charity" => Some(Self::Charity),
            "fasting" => Some(Self::Fasting),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: HabitCategory,
    /// Check-ins needed for a day to count as done (>= 1).
    pub target_per_day: u32,
    /// Hidden from the default list.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with a daily target of one.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        category: HabitCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            category,
            target_per_day: 1,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set daily target.
    #[must_use]
    pub const fn with_target(mut self, target_per_day: u32) -> Self {
        self.target_per_day = target_per_day;
        self
    }
}

/// Check-ins recorded for a habit on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Habit identifier.
    pub habit_id: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Number of check-ins that day.
    pub count: u32,
}

impl HabitLog {
    /// Create a log entry.
    #[must_use]
    pub fn new(habit_id: impl Into<String>, date: NaiveDate, count: u32) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            count,
        }
    }
}
