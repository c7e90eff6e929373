//! `StorageTrait` implementation for `SqliteStorage`.

#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StorageError;
use crate::traits::StorageTrait;

use super::core::SqliteStorage;
use super::types::{
    GrowthPlan, Habit, HabitLog, LearningContent, LearningFilter, PersonalizationSettings,
    PlanStatus, ReflectionFilter, SelfReflection,
};

#[async_trait]
impl StorageTrait for SqliteStorage {
    async fn insert_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError> {
        Self::insert_reflection(self, reflection).await
    }

    async fn get_reflection(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SelfReflection>, StorageError> {
        Self::get_reflection(self, user_id, id).await
    }

    async fn list_reflections(
        &self,
        user_id: &str,
        filter: &ReflectionFilter,
    ) -> Result<Vec<SelfReflection>, StorageError> {
        Self::list_reflections(self, user_id, filter).await
    }

    async fn reflections_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SelfReflection>, StorageError> {
        Self::reflections_since(self, user_id, since).await
    }

    async fn update_reflection(&self, reflection: &SelfReflection) -> Result<(), StorageError> {
        Self::update_reflection(self, reflection).await
    }

    async fn delete_reflection(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        Self::delete_reflection(self, user_id, id).await
    }

    async fn insert_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError> {
        Self::insert_growth_plan(self, plan).await
    }

    async fn get_growth_plan(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<GrowthPlan>, StorageError> {
        Self::get_growth_plan(self, user_id, id).await
    }

    async fn list_growth_plans(
        &self,
        user_id: &str,
        status: Option<PlanStatus>,
    ) -> Result<Vec<GrowthPlan>, StorageError> {
        Self::list_growth_plans(self, user_id, status).await
    }

    async fn update_growth_plan(&self, plan: &GrowthPlan) -> Result<(), StorageError> {
        Self::update_growth_plan(self, plan).await
    }

    async fn delete_growth_plan(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        Self::delete_growth_plan(self, user_id, id).await
    }

    async fn get_personalization(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalizationSettings>, StorageError> {
        Self::get_personalization(self, user_id).await
    }

    async fn upsert_personalization(
        &self,
        settings: &PersonalizationSettings,
    ) -> Result<(), StorageError> {
        Self::upsert_personalization(self, settings).await
    }

    async fn delete_personalization(&self, user_id: &str) -> Result<bool, StorageError> {
        Self::delete_personalization(self, user_id).await
    }

    async fn insert_learning_content(
        &self,
        content: &LearningContent,
    ) -> Result<(), StorageError> {
        Self::insert_learning_content(self, content).await
    }

    async fn get_learning_content(
        &self,
        id: &str,
    ) -> Result<Option<LearningContent>, StorageError> {
        Self::get_learning_content(self, id).await
    }

    async fn list_learning_content(
        &self,
        filter: &LearningFilter,
    ) -> Result<Vec<LearningContent>, StorageError> {
        Self::list_learning_content(self, filter).await
    }

    async fn update_learning_content(
        &self,
        content: &LearningContent,
    ) -> Result<(), StorageError> {
        Self::update_learning_content(self, content).await
    }

    async fn delete_learning_content(&self, id: &str) -> Result<bool, StorageError> {
        Self::delete_learning_content(self, id).await
    }

    async fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        Self::insert_habit(self, habit).await
    }

    async fn get_habit(&self, user_id: &str, id: &str) -> Result<Option<Habit>, StorageError> {
        Self::get_habit(self, user_id, id).await
    }

    async fn list_habits(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Habit>, StorageError> {
        Self::list_habits(self, user_id, include_archived).await
    }

    async fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        Self::update_habit(self, habit).await
    }

    async fn delete_habit(&self, user_id: &str, id: &str) -> Result<bool, StorageError> {
        Self::delete_habit(self, user_id, id).await
    }

    async fn upsert_habit_log(&self, log: &HabitLog) -> Result<(), StorageError> {
        Self::upsert_habit_log(self, log).await
    }

    async fn delete_habit_log(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<bool, StorageError> {
        Self::delete_habit_log(self, habit_id, date).await
    }

    async fn habit_logs(&self, habit_id: &str) -> Result<Vec<HabitLog>, StorageError> {
        Self::habit_logs(self, habit_id).await
    }
}
