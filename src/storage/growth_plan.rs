//! Growth plan storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::Row;

use super::core::{SqliteStorage, DATE_FORMAT};
use super::types::{FocusArea, GrowthPlan, PlanGoal, PlanStatus};
use crate::error::StorageError;

const COLUMNS: &str = "id, user_id, title, description, focus_area, status, goals, target_date, \
                       created_at, updated_at";

impl SqliteStorage {
    /// Insert a new growth plan.
    pub async fn insert_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO growth_plans
                (id, user_id, title, description, focus_area, status, goals, target_date,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&plan.id)
        .bind(&plan.user_id)
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.focus_area.as_str())
        .bind(plan.status.as_str())
        .bind(Self::to_json(&plan.goals)?)
        .bind(plan.target_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(Self::format_datetime(&plan.created_at))
        .bind(Self::format_datetime(&plan.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT growth_plans", format!("{e}")))?;

        Ok(())
    }

    /// Get a plan owned by a user.
    pub async fn get_growth_plan(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<GrowthPlan>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM growth_plans WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT growth_plans", format!("{e}")))?;

        row.as_ref().map(Self::row_to_growth_plan).transpose()
    }

    /// List a user's plans, most recently updated first.
    pub async fn list_growth_plans(
        &self,
        user_id: &str,
        status: Option<PlanStatus>,
    ) -> Result<Vec<GrowthPlan>, StorageError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM growth_plans
                     WHERE user_id = ? AND status = ? ORDER BY updated_at DESC"
                ))
                .bind(user_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM growth_plans WHERE user_id = ? ORDER BY updated_at DESC"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| Self::query_error("SELECT growth_plans", format!("{e}")))?;

        rows.iter().map(Self::row_to_growth_plan).collect()
    }

    /// Overwrite a stored plan.
    pub async fn update_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE growth_plans
             SET title = ?, description = ?, focus_area = ?, status = ?, goals = ?,
                 target_date = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.focus_area.as_str())
        .bind(plan.status.as_str())
        .bind(Self::to_json(&plan.goals)?)
        .bind(plan.target_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(Self::format_datetime(&plan.updated_at))
        .bind(&plan.id)
        .bind(&plan.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPDATE growth_plans", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("growth plan", &plan.id));
        }

        Ok(())
    }

    /// Delete a plan. Returns whether a row was removed.
    pub async fn delete_growth_plan(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM growth_plans WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE growth_plans", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_growth_plan(row: &sqlx::sqlite::SqliteRow) -> Result<GrowthPlan, StorageError> {
        let focus_str: String = row.get("focus_area");
        let status_str: String = row.get("status");
        let goals_str: String = row.get("goals");
        let target_str: Option<String> = row.get("target_date");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(GrowthPlan {
            id: row.get("id"),
            user_id: row.get("user_id"),
            title: row.get("title"),
            description: row.get("description"),
            focus_area: FocusArea::from_str(&focus_str)
                .ok_or_else(|| Self::bad_enum("focus_area", &focus_str))?,
            status: PlanStatus::from_str(&status_str)
                .ok_or_else(|| Self::bad_enum("status", &status_str))?,
            goals: Self::from_json::<Vec<PlanGoal>>("goals", &goals_str)?,
            target_date: target_str.as_deref().map(Self::parse_date).transpose()?,
            created_at: Self::parse_datetime(&created_at_str)?,
            updated_at: Self::parse_datetime(&updated_at_str)?,
        })
    }
}
