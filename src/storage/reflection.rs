//! Self-reflection storage operations.

#![allow(clippy::missing_errors_doc)]

use chrono::{DateTime, Utc};
use sqlx::Row;

use super::core::SqliteStorage;
use super::types::{AnalysisStatus, Mood, ReflectionAnalysis, ReflectionFilter, SelfReflection};
use crate::error::StorageError;

const COLUMNS: &str =
    "id, user_id, mood, intensity, content, analysis, analysis_status, created_at, updated_at";

impl SqliteStorage {
    /// Insert a new reflection.
    pub async fn insert_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError> {
        let analysis = reflection
            .analysis
            .as_ref()
            .map(Self::to_json)
            .transpose()?;

        sqlx::query(
            "INSERT INTO self_reflections
                (id, user_id, mood, intensity, content, analysis, analysis_status,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&reflection.id)
        .bind(&reflection.user_id)
        .bind(reflection.mood.as_str())
        .bind(reflection.intensity)
        .bind(&reflection.content)
        .bind(analysis)
        .bind(reflection.analysis_status.as_str())
        .bind(Self::format_datetime(&reflection.created_at))
        .bind(Self::format_datetime(&reflection.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT self_reflections", format!("{e}")))?;

        Ok(())
    }

    /// Get a reflection owned by a user.
    pub async fn get_reflection(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SelfReflection>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM self_reflections WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT self_reflections", format!("{e}")))?;

        row.as_ref().map(Self::row_to_reflection).transpose()
    }

    /// List a user's reflections, newest first.
    pub async fn list_reflections(
        &self,
        user_id: &str,
        filter: &ReflectionFilter,
    ) -> Result<Vec<SelfReflection>, StorageError> {
        let rows = match filter.mood {
            Some(mood) => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM self_reflections
                     WHERE user_id = ? AND mood = ?
                     ORDER BY created_at DESC LIMIT ?"
                ))
                .bind(user_id)
                .bind(mood.as_str())
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM self_reflections
                     WHERE user_id = ?
                     ORDER BY created_at DESC LIMIT ?"
                ))
                .bind(user_id)
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| Self::query_error("SELECT self_reflections", format!("{e}")))?;

        rows.iter().map(Self::row_to_reflection).collect()
    }

    /// Reflections created at or after `since`, oldest first.
    pub async fn reflections_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SelfReflection>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM self_reflections
             WHERE user_id = ? AND created_at >= ?
             ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .bind(Self::format_datetime(&since))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT self_reflections", format!("{e}")))?;

        rows.iter().map(Self::row_to_reflection).collect()
    }

    /// Overwrite the mutable fields of a reflection.
    pub async fn update_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError> {
        let analysis = reflection
            .analysis
            .as_ref()
            .map(Self::to_json)
            .transpose()?;

        let result = sqlx::query(
            "UPDATE self_reflections
             SET mood = ?, intensity = ?, content = ?, analysis = ?, analysis_status = ?,
                 updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(reflection.mood.as_str())
        .bind(reflection.intensity)
        .bind(&reflection.content)
        .bind(analysis)
        .bind(reflection.analysis_status.as_str())
        .bind(Self::format_datetime(&reflection.updated_at))
        .bind(&reflection.id)
        .bind(&reflection.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPDATE self_reflections", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("reflection", &reflection.id));
        }

        Ok(())
    }

    /// Delete a reflection. Returns whether a row was removed.
    pub async fn delete_reflection(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM self_reflections WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE self_reflections", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_reflection(row: &sqlx::sqlite::SqliteRow) -> Result<SelfReflection, StorageError> {
        let mood_str: String = row.get("mood");
        let status_str: String = row.get("analysis_status");
        let analysis_str: Option<String> = row.get("analysis");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        let analysis = analysis_str
            .map(|s| Self::from_json::<ReflectionAnalysis>("analysis", &s))
            .transpose()?;

        Ok(SelfReflection {
            id: row.get("id"),
            user_id: row.get("user_id"),
            mood: Mood::from_str(&mood_str).ok_or_else(|| Self::bad_enum("mood", &mood_str))?,
            intensity: row.get("intensity"),
            content: row.get("content"),
            analysis,
            analysis_status: AnalysisStatus::from_str(&status_str).unwrap_or_default(),
            created_at: Self::parse_datetime(&created_at_str)?,
            updated_at: Self::parse_datetime(&updated_at_str)?,
        })
    }
}
