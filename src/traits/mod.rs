//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`AnthropicClientTrait`]: Language model client abstraction
//! - [`ImageClientTrait`]: Image generation abstraction
//! - [`QuranClientTrait`]: Quran text lookup abstraction
//! - [`StorageTrait`]: Database operations abstraction
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use barakah::traits::{RealTimeProvider, TimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Usage};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ImageError, QuranError, ServiceError, StorageError};
use crate::image::GeneratedImage;
use crate::quran::Verse;
use crate::storage::{
    GrowthPlan, Habit, HabitLog, LearningContent, LearningFilter, PersonalizationSettings,
    PlanStatus, ReflectionFilter, SelfReflection,
};

/// Language model client trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnthropicClientTrait: Send + Sync {
    /// Send a completion request to the model.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ApiUnavailable`] if the call fails after retries.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, ServiceError>;
}

/// Image generation client trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageClientTrait: Send + Sync {
    /// Generate one image for a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the provider rejects the prompt or fails.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;
}

/// Quran text client trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuranClientTrait: Send + Sync {
    /// Fetch the Arabic text and a translation of one verse.
    ///
    /// `reference` is either `surah:ayah` or an absolute verse number (1-6236).
    ///
    /// # Errors
    ///
    /// Returns [`QuranError`] for unknown references or provider failures.
    async fn fetch_verse(&self, reference: &str, translation: &str) -> Result<Verse, QuranError>;
}

/// Storage trait for mocking.
///
/// Every user-owned lookup takes the owning user id; a record owned by
/// someone else behaves exactly like a missing one.
#[allow(clippy::missing_errors_doc)]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageTrait: Send + Sync {
    /// Insert a reflection.
    async fn insert_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError>;

    /// Get a reflection.
    async fn get_reflection(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SelfReflection>, StorageError>;

    /// List reflections, newest first.
    async fn list_reflections(
        &self,
        user_id: &str,
        filter: &ReflectionFilter,
    ) -> Result<Vec<SelfReflection>, StorageError>;

    /// Reflections created at or after `since`.
    async fn reflections_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SelfReflection>, StorageError>;

    /// Overwrite a reflection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no owned row matches.
    async fn update_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError>;

    /// Delete a reflection; `false` when nothing matched.
    async fn delete_reflection(&self, user_id: &str, id: &str) -> Result<bool, StorageError>;

    /// Insert a growth plan.
    async fn insert_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError>;

    /// Get a growth plan.
    async fn get_growth_plan(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<GrowthPlan>, StorageError>;

    /// List growth plans, optionally by status.
    async fn list_growth_plans(
        &self,
        user_id: &str,
        status: Option<PlanStatus>,
    ) -> Result<Vec<GrowthPlan>, StorageError>;

    /// Overwrite a growth plan.
    async fn update_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError>;

    /// Delete a growth plan; `false` when nothing matched.
    async fn delete_growth_plan(&self, user_id: &str, id: &str) -> Result<bool, StorageError>;

    /// Stored personalization settings, if any.
    async fn get_personalization(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalizationSettings>, StorageError>;

    /// Insert or replace personalization settings.
    async fn upsert_personalization(
        &self,
        settings: &PersonalizationSettings,
    ) -> Result<(), StorageError>;

    /// Remove personalization settings; `false` when none were stored.
    async fn delete_personalization(&self, user_id: &str) -> Result<bool, StorageError>;

    /// Insert a learning library entry.
    async fn insert_learning_content(&self, content: &LearningContent)
        -> Result<(), StorageError>;

    /// Get a learning library entry.
    async fn get_learning_content(&self, id: &str)
        -> Result<Option<LearningContent>, StorageError>;

    /// List learning library entries.
    async fn list_learning_content(
        &self,
        filter: &LearningFilter,
    ) -> Result<Vec<LearningContent>, StorageError>;

    /// Overwrite a learning library entry.
    async fn update_learning_content(&self, content: &LearningContent)
        -> Result<(), StorageError>;

    /// Delete a learning library entry; `false` when nothing matched.
    async fn delete_learning_content(&self, id: &str) -> Result<bool, StorageError>;

    /// Insert a habit.
    async fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit.
    async fn get_habit(&self, user_id: &str, id: &str) -> Result<Option<Habit>, StorageError>;

    /// List habits.
    async fn list_habits(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Habit>, StorageError>;

    /// Overwrite a habit.
    async fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and its logs; `false` when nothing matched.
    async fn delete_habit(&self, user_id: &str, id: &str) -> Result<bool, StorageError>;

    /// Insert or replace a day's log.
    async fn upsert_habit_log(&self, log: &HabitLog) -> Result<(), StorageError>;

    /// Remove a day's log; `false` when none existed.
    async fn delete_habit_log(&self, habit_id: &str, date: NaiveDate)
        -> Result<bool, StorageError>;

    /// All logs of a habit, oldest first.
    async fn habit_logs(&self, habit_id: &str) -> Result<Vec<HabitLog>, StorageError>;
}

/// Time provider trait for deterministic testing.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
