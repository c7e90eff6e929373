//! Personalization settings storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::Row;

use super::core::SqliteStorage;
use super::types::{PersonalizationSettings, SpiritualLevel};
use crate::error::StorageError;

impl SqliteStorage {
    /// Get stored settings for a user, if any.
    pub async fn get_personalization(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalizationSettings>, StorageError> {
        let row = sqlx::query(
            "SELECT user_id, display_name, preferred_language, translation_edition, spiritual_level,
                    interests, goals, reminder_time, hijri_adjustment_days, updated_at
             FROM personalization_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT personalization_settings", format!("{e}")))?;

        row.as_ref().map(Self::row_to_settings).transpose()
    }

    /// Insert or replace a user's settings.
    pub async fn upsert_personalization(
        &self,
        settings: &PersonalizationSettings,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO personalization_settings
                (user_id, display_name, preferred_language, translation_edition, spiritual_level,
                 interests, goals, reminder_time, hijri_adjustment_days, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                preferred_language = excluded.preferred_language,
                translation_edition = excluded.translation_edition,
                spiritual_level = excluded.spiritual_level,
                interests = excluded.interests,
                goals = excluded.goals,
                reminder_time = excluded.reminder_time,
                hijri_adjustment_days = excluded.hijri_adjustment_days,
                updated_at = excluded.updated_at",
        )
        .bind(&settings.user_id)
        .bind(&settings.display_name)
        .bind(&settings.preferred_language)
        .bind(&settings.translation_edition)
        .bind(settings.spiritual_level.as_str())
        .bind(Self::to_json(&settings.interests)?)
        .bind(Self::to_json(&settings.goals)?)
        .bind(&settings.reminder_time)
        .bind(settings.hijri_adjustment_days)
        .bind(Self::format_datetime(&settings.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPSERT personalization_settings", format!("{e}")))?;

        Ok(())
    }

    /// Remove a user's settings. Returns whether a row was removed.
    pub async fn delete_personalization(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM personalization_settings WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE personalization_settings", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_settings(
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<PersonalizationSettings, StorageError> {
        let level_str: String = row.get("spiritual_level");
        let interests_str: String = row.get("interests");
        let goals_str: String = row.get("goals");
        let updated_at_str: String = row.get("updated_at");

        Ok(PersonalizationSettings {
            user_id: row.get("user_id"),
            display_name: row.get("display_name"),
            preferred_language: row.get("preferred_language"),
            translation_edition: row.get("translation_edition"),
            spiritual_level: SpiritualLevel::from_str(&level_str).unwrap_or_default(),
            interests: Self::from_json("interests", &interests_str)?,
            goals: Self::from_json("goals", &goals_str)?,
            reminder_time: row.get("reminder_time"),
            hijri_adjustment_days: row.get("hijri_adjustment_days"),
            updated_at: Self::parse_datetime(&updated_at_str)?,
        })
    }
}
