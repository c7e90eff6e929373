//! Learning content storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::Row;

use super::core::SqliteStorage;
use super::types::{ContentCategory, LearningContent, LearningFilter, SpiritualLevel};
use crate::error::StorageError;

const COLUMNS: &str =
    "id, title, category, body, source, difficulty, tags, created_at, updated_at";

impl SqliteStorage {
    /// Insert a library entry.
    pub async fn insert_learning_content(
        &self,
        content: &LearningContent,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO learning_content
                (id, title, category, body, source, difficulty, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&content.id)
        .bind(&content.title)
        .bind(content.category.as_str())
        .bind(&content.body)
        .bind(&content.source)
        .bind(content.difficulty.as_str())
        .bind(Self::to_json(&content.tags)?)
        .bind(Self::format_datetime(&content.created_at))
        .bind(Self::format_datetime(&content.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT learning_content", format!("{e}")))?;

        Ok(())
    }

    /// Get a library entry by ID.
    pub async fn get_learning_content(
        &self,
        id: &str,
    ) -> Result<Option<LearningContent>, StorageError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM learning_content WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT learning_content", format!("{e}")))?;

        row.as_ref().map(Self::row_to_learning_content).transpose()
    }

    /// List library entries matching a filter, newest first.
    pub async fn list_learning_content(
        &self,
        filter: &LearningFilter,
    ) -> Result<Vec<LearningContent>, StorageError> {
        let category = filter.category.map(|c| c.as_str());
        let difficulty = filter.difficulty.map(|d| d.as_str());
        let pattern = filter
            .search
            .as_deref()
            .map(|q| format!("%{}%", q.to_lowercase()));

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM learning_content
             WHERE (?1 IS NULL OR category = ?1)
               AND (?2 IS NULL OR difficulty = ?2)
               AND (?3 IS NULL
                    OR LOWER(title) LIKE ?3
                    OR LOWER(body) LIKE ?3
                    OR LOWER(tags) LIKE ?3)
             ORDER BY created_at DESC
             LIMIT ?4"
        ))
        .bind(category)
        .bind(difficulty)
        .bind(pattern)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT learning_content", format!("{e}")))?;

        rows.iter().map(Self::row_to_learning_content).collect()
    }

    /// Overwrite a library entry.
    pub async fn update_learning_content(
        &self,
        content: &LearningContent,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE learning_content
             SET title = ?, category = ?, body = ?, source = ?, difficulty = ?, tags = ?,
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&content.title)
        .bind(content.category.as_str())
        .bind(&content.body)
        .bind(&content.source)
        .bind(content.difficulty.as_str())
        .bind(Self::to_json(&content.tags)?)
        .bind(Self::format_datetime(&content.updated_at))
        .bind(&content.id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPDATE learning_content", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("learning content", &content.id));
        }

        Ok(())
    }

    /// Delete a library entry. Returns whether a row was removed.
    pub async fn delete_learning_content(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM learning_content WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE learning_content", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_learning_content(
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<LearningContent, StorageError> {
        let category_str: String = row.get("category");
        let difficulty_str: String = row.get("difficulty");
        let tags_str: String = row.get("tags");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(LearningContent {
            id: row.get("id"),
            title: row.get("title"),
            category: ContentCategory::from_str(&category_str)
                .ok_or_else(|| Self::bad_enum("category", &category_str))?,
            body: row.get("body"),
            source: row.get("source"),
            difficulty: SpiritualLevel::from_str(&difficulty_str).unwrap_or_default(),
            tags: Self::from_json("tags", &tags_str)?,
            created_at: Self::parse_datetime(&created_at_str)?,
            updated_at: Self::parse_datetime(&updated_at_str)?,
        })
    }
}
