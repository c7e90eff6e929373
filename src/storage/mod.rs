//! Storage backend.
//!
//! This module provides:
//! - `SQLite` database implementation
//! - Self-reflection, growth plan, personalization, learning content and
//!   habit CRUD operations
//!
//! # Architecture
//!
//! The storage layer uses `SQLite` with the `sqlx` crate for async operations.
//! Every user-owned query is filtered by `user_id`.
//!
//! The implementation is split across submodules:
//! - `core`: Pool management, migrations, and helper functions
//! - `reflection`: Self-reflection operations
//! - `growth_plan`: Growth plan operations
//! - `personalization`: Settings operations
//! - `learning`: Learning library operations
//! - `habit`: Habit and habit log operations
//! - `trait_impl`: `StorageTrait` implementation
//!
//! # Example
//!
//! ```ignore
//! use barakah::storage::SqliteStorage;
//!
//! let storage = SqliteStorage::new("./data/barakah.db").await?;
//! let habits = storage.list_habits(user_id, false).await?;
//! ```

mod core;
mod growth_plan;
mod habit;
mod learning;
mod personalization;
mod reflection;
mod trait_impl;
mod types;

pub use self::core::SqliteStorage;
pub use types::{
    AnalysisStatus, ContentCategory, FocusArea, GrowthPlan, Habit, HabitCategory, HabitLog,
    LearningContent, LearningFilter, Mood, PersonalizationSettings, PlanGoal, PlanStatus,
    ReflectionAnalysis, ReflectionFilter, SelfReflection, SpiritualLevel, VerseCitation,
    DEFAULT_LANGUAGE, DEFAULT_TRANSLATION,
};
