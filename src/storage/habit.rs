//! Habit and habit log storage operations.

#![allow(clippy::missing_errors_doc)]

use chrono::NaiveDate;
use sqlx::Row;

use super::core::{SqliteStorage, DATE_FORMAT};
use super::types::{Habit, HabitCategory, HabitLog};
use crate::error::StorageError;

const COLUMNS: &str =
    "id, user_id, name, category, target_per_day, archived, created_at, updated_at";

impl SqliteStorage {
    /// Insert a new habit.
    pub async fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO habits
                (id, user_id, name, category, target_per_day, archived, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&habit.id)
        .bind(&habit.user_id)
        .bind(&habit.name)
        .bind(habit.category.as_str())
        .bind(habit.target_per_day)
        .bind(habit.archived)
        .bind(Self::format_datetime(&habit.created_at))
        .bind(Self::format_datetime(&habit.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT habits", format!("{e}")))?;

        Ok(())
    }

    /// Get a habit owned by a user.
    pub async fn get_habit(&self, user_id: &str, id: &str) -> Result<Option<Habit>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM habits WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT habits", format!("{e}")))?;

        row.as_ref().map(Self::row_to_habit).transpose()
    }

    /// List a user's habits in creation order.
    pub async fn list_habits(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Habit>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM habits
             WHERE user_id = ? AND (? OR archived = 0)
             ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT habits", format!("{e}")))?;

        rows.iter().map(Self::row_to_habit).collect()
    }

    /// Overwrite a stored habit.
    pub async fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE habits
             SET name = ?, category = ?, target_per_day = ?, archived = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&habit.name)
        .bind(habit.category.as_str())
        .bind(habit.target_per_day)
        .bind(habit.archived)
        .bind(Self::format_datetime(&habit.updated_at))
        .bind(&habit.id)
        .bind(&habit.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPDATE habits", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("habit", &habit.id));
        }

        Ok(())
    }

    /// Delete a habit and its logs. Returns whether a row was removed.
    pub async fn delete_habit(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE habits", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert or replace the log for a habit and day.
    pub async fn upsert_habit_log(&self, log: &HabitLog) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO habit_logs (habit_id, date, count) VALUES (?, ?, ?)
             ON CONFLICT(habit_id, date) DO UPDATE SET count = excluded.count",
        )
        .bind(&log.habit_id)
        .bind(log.date.format(DATE_FORMAT).to_string())
        .bind(log.count)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPSERT habit_logs", format!("{e}")))?;

        Ok(())
    }

    /// Get the log for a habit and day.
    pub async fn get_habit_log(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HabitLog>, StorageError> {
        let row = sqlx::query(
            "SELECT habit_id, date, count FROM habit_logs WHERE habit_id = ? AND date = ?",
        )
        .bind(habit_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT habit_logs", format!("{e}")))?;

        row.as_ref().map(Self::row_to_habit_log).transpose()
    }

    /// Remove the log for a habit and day. Returns whether a row was removed.
    pub async fn delete_habit_log(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM habit_logs WHERE habit_id = ? AND date = ?")
            .bind(habit_id)
            .bind(date.format(DATE_FORMAT).to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE habit_logs", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// All logs of a habit, oldest day first.
    pub async fn habit_logs(&self, habit_id: &str) -> Result<Vec<HabitLog>, StorageError> {
        let rows = sqlx::query(
            "SELECT habit_id, date, count FROM habit_logs WHERE habit_id = ? ORDER BY date ASC",
        )
        .bind(habit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT habit_logs", format!("{e}")))?;

        rows.iter().map(Self::row_to_habit_log).collect()
    }

    fn row_to_habit(row: &sqlx::sqlite::SqliteRow) -> Result<Habit, StorageError> {
        let category_str: String = row.get("category");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(Habit {
            id: row.get("id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            category: HabitCategory::from_str(&category_str).unwrap_or_default(),
            target_per_day: row.get("target_per_day"),
            archived: row.get("archived"),
            created_at: Self::parse_datetime(&created_at_str)?,
            updated_at: Self::parse_datetime(&updated_at_str)?,
        })
    }

    fn row_to_habit_log(row: &sqlx::sqlite::SqliteRow) -> Result<HabitLog, StorageError> {
        let date_str: String = row.get("date");
        Ok(HabitLog {
            habit_id: row.get("habit_id"),
            date: Self::parse_date(&date_str)?,
            count: row.get("count"),
        })
    }
}
