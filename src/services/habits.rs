//! Habit tracking.
//!
//! A habit has a daily target; each day's check-ins are stored as one log
//! row. A day counts as done when its count reaches the target.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::core::{generate_id, validate_text};
use crate::error::ServiceError;
use crate::storage::{Habit, HabitCategory, HabitLog};
use crate::traits::StorageTrait;

/// Longest habit name.
pub const MAX_NAME_LENGTH: usize = 100;
/// Largest daily target.
pub const MAX_TARGET_PER_DAY: u32 = 100;
/// Largest single check-in count.
pub const MAX_CHECK_IN_COUNT: u32 = 1_000;
/// Window for the completion rate, in days.
pub const COMPLETION_WINDOW_DAYS: i64 = 30;

const fn default_target() -> u32 {
    1
}

/// Fields of a new habit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
    /// Display name.
    pub name: String,
    /// Kind of habit.
    #[serde(default)]
    pub category: HabitCategory,
    /// Check-ins needed per day.
    #[serde(default = "default_target")]
    pub target_per_day: u32,
}

/// Changes to a habit; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitUpdate {
    /// Display name.
    pub name: Option<String>,
    /// Kind of habit.
    pub category: Option<HabitCategory>,
    /// Check-ins needed per day.
    pub target_per_day: Option<u32>,
    /// Hidden from the default listing.
    pub archived: Option<bool>,
}

/// Streaks and totals for one habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    /// Habit id.
    pub habit_id: String,
    /// Consecutive done days ending today, or yesterday if today is open.
    pub current_streak: u32,
    /// Longest run of consecutive done days.
    pub longest_streak: u32,
    /// Done days in the last 30 days (today included) divided by 30.
    pub completion_rate: f64,
    /// Sum of all check-in counts.
    pub total_check_ins: u64,
    /// Whether today's target is met.
    pub completed_today: bool,
}

fn validate_target(target: u32) -> Result<(), ServiceError> {
    if (1..=MAX_TARGET_PER_DAY).contains(&target) {
        Ok(())
    } else {
        Err(ServiceError::invalid(
            "target_per_day",
            format!("must be between 1 and {MAX_TARGET_PER_DAY}, got {target}"),
        ))
    }
}

/// Compute streaks and totals from a habit's logs.
///
/// Logs dated after `today` are ignored.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(
    habit_id: &str,
    logs: &[HabitLog],
    target: u32,
    today: NaiveDate,
) -> HabitStats {
    let counts: HashMap<NaiveDate, u32> = logs
        .iter()
        .filter(|log| log.date <= today)
        .map(|log| (log.date, log.count))
        .collect();
    let done = |date: NaiveDate| counts.get(&date).is_some_and(|&c| c >= target);

    let completed_today = done(today);
    let mut current_streak = 0;
    let mut cursor = if completed_today {
        Some(today)
    } else {
        today.pred_opt()
    };
    while let Some(day) = cursor.filter(|d| done(*d)) {
        current_streak += 1;
        cursor = day.pred_opt();
    }

    let mut done_days: Vec<NaiveDate> = counts
        .iter()
        .filter(|(_, &c)| c >= target)
        .map(|(&d, _)| d)
        .collect();
    done_days.sort_unstable();

    let mut longest_streak = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in &done_days {
        run = match previous {
            Some(p) if *day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        previous = Some(*day);
    }

    let window_start = today - Duration::days(COMPLETION_WINDOW_DAYS - 1);
    let recent = done_days.iter().filter(|d| **d >= window_start).count();
    let completion_rate = recent as f64 / COMPLETION_WINDOW_DAYS as f64;

    HabitStats {
        habit_id: habit_id.to_string(),
        current_streak,
        longest_streak,
        completion_rate,
        total_check_ins: counts.values().map(|&c| u64::from(c)).sum(),
        completed_today,
    }
}

/// Habit tracking service.
pub struct HabitService<S>
where
    S: StorageTrait,
{
    storage: Arc<S>,
}

impl<S> HabitService<S>
where
    S: StorageTrait,
{
    /// Create a habit service.
    #[must_use]
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Start tracking a habit.
    ///
    /// # Errors
    ///
    /// Returns validation or storage errors.
    pub async fn create(&self, user_id: &str, input: NewHabit) -> Result<Habit, ServiceError> {
        validate_text("name", &input.name, MAX_NAME_LENGTH)?;
        validate_target(input.target_per_day)?;

        let habit = Habit::new(generate_id(), user_id, input.name.trim(), input.category)
            .with_target(input.target_per_day);
        self.storage.insert_habit(&habit).await?;
        tracing::info!(user_id = %user_id, habit_id = %habit.id, "Created habit");
        Ok(habit)
    }

    /// A user's habits.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the query fails.
    pub async fn list(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Habit>, ServiceError> {
        Ok(self.storage.list_habits(user_id, include_archived).await?)
    }

    /// One habit.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the user has no such habit.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<Habit, ServiceError> {
        self.storage
            .get_habit(user_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "habit".to_string(),
                id: id.to_string(),
            })
    }

    /// Apply changes.
    ///
    /// # Errors
    ///
    /// Returns validation errors or [`ServiceError::NotFound`].
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        changes: HabitUpdate,
    ) -> Result<Habit, ServiceError> {
        let mut habit = self.get(user_id, id).await?;
        if let Some(name) = changes.name {
            validate_text("name", &name, MAX_NAME_LENGTH)?;
            habit.name = name.trim().to_string();
        }
        if let Some(category) = changes.category {
            habit.category = category;
        }
        if let Some(target) = changes.target_per_day {
            validate_target(target)?;
            habit.target_per_day = target;
        }
        if let Some(archived) = changes.archived {
            habit.archived = archived;
        }
        habit.updated_at = Utc::now();

        self.storage.update_habit(&habit).await?;
        tracing::info!(user_id = %user_id, habit_id = %id, "Updated habit");
        Ok(habit)
    }

    /// Delete a habit and its history.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_habit(user_id, id).await? {
            return Err(ServiceError::NotFound {
                resource: "habit".to_string(),
                id: id.to_string(),
            });
        }
        tracing::info!(user_id = %user_id, habit_id = %id, "Deleted habit");
        Ok(())
    }

    /// Record `count` check-ins for `date`, replacing that day's log.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a zero count or a date
    /// after `today`, and [`ServiceError::NotFound`] for an unknown habit.
    pub async fn check_in(
        &self,
        user_id: &str,
        id: &str,
        date: NaiveDate,
        count: u32,
        today: NaiveDate,
    ) -> Result<HabitLog, ServiceError> {
        if !(1..=MAX_CHECK_IN_COUNT).contains(&count) {
            return Err(ServiceError::invalid(
                "count",
                format!("must be between 1 and {MAX_CHECK_IN_COUNT}, got {count}"),
            ));
        }
        if date > today {
            return Err(ServiceError::invalid(
                "date",
                format!("{date} is in the future"),
            ));
        }
        let habit = self.get(user_id, id).await?;

        let log = HabitLog::new(&habit.id, date, count);
        self.storage.upsert_habit_log(&log).await?;
        tracing::info!(habit_id = %id, date = %date, count, "Checked in");
        Ok(log)
    }

    /// Remove the log for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown habit or a day
    /// without a check-in.
    pub async fn undo_check_in(
        &self,
        user_id: &str,
        id: &str,
        date: NaiveDate,
    ) -> Result<(), ServiceError> {
        let habit = self.get(user_id, id).await?;
        if !self.storage.delete_habit_log(&habit.id, date).await? {
            return Err(ServiceError::NotFound {
                resource: "check-in".to_string(),
                id: format!("{id}/{date}"),
            });
        }
        tracing::info!(habit_id = %id, date = %date, "Undid check-in");
        Ok(())
    }

    /// Streaks and totals as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown habit.
    pub async fn stats(
        &self,
        user_id: &str,
        id: &str,
        today: NaiveDate,
    ) -> Result<HabitStats, ServiceError> {
        let habit = self.get(user_id, id).await?;
        let logs = self.storage.habit_logs(&habit.id).await?;
        Ok(compute_stats(&habit.id, &logs, habit.target_per_day, today))
    }
}

impl<S> std::fmt::Debug for HabitService<S>
where
    S: StorageTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HabitService")
            .field("storage", &"<StorageTrait>")
            .finish()
    }
}
