//! Shared application state.
//!
//! [`AppState`] is cloned into every handler. It owns the long-lived
//! clients and hands out cheap, per-request service values.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::anthropic::{AnthropicClient, ClientConfig};
use crate::config::Config;
use crate::error::AppError;
use crate::image::ImageClient;
use crate::quran::QuranClient;
use crate::reminder::{ReminderCache, ReminderService};
use crate::services::{
    GrowthPlanService, HabitService, InsightService, LearningService, PersonalizationService,
    ReflectionService,
};
use crate::storage::SqliteStorage;
use crate::traits::{RealTimeProvider, TimeProvider};

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,
    /// Database.
    pub storage: Arc<SqliteStorage>,
    /// Anthropic client for insights, analyses and reminders.
    pub client: Arc<AnthropicClient>,
    /// Quran text client.
    pub quran: Arc<QuranClient>,
    /// Image client, absent when no image key is configured.
    pub image: Option<Arc<ImageClient>>,
    /// Daily reminder cache.
    pub reminders: Arc<ReminderCache>,
    /// Clock used for "today".
    pub clock: Arc<dyn TimeProvider>,
}

impl AppState {
    /// Build the state around an opened database.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if one of the HTTP clients cannot be built.
    pub fn new(config: Config, storage: SqliteStorage) -> Result<Self, AppError> {
        let client = AnthropicClient::new(
            config.api_key.expose(),
            ClientConfig::from_app_config(&config),
        )?;
        let quran = QuranClient::new(&config.quran_base_url, config.request_timeout_ms)?;
        let image = ImageClient::from_config(&config)?.map(Arc::new);
        let clock: Arc<dyn TimeProvider> = Arc::new(RealTimeProvider);

        Ok(Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            client: Arc::new(client),
            quran: Arc::new(quran),
            image,
            reminders: Arc::new(ReminderCache::with_clock(Arc::clone(&clock))),
            clock,
        })
    }

    /// Open the configured database and build the state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the database cannot be opened or migrated,
    /// or a client cannot be built.
    pub async fn from_config(config: Config) -> Result<Self, AppError> {
        let storage = SqliteStorage::new(&config.database_path).await?;
        Self::new(config, storage)
    }

    /// Replace the clock; the reminder cache is rebuilt on the same clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.reminders = Arc::new(ReminderCache::with_clock(Arc::clone(&clock)));
        self.clock = clock;
        self
    }

    /// Current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current UTC date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Reflection service.
    #[must_use]
    pub fn reflections(&self) -> ReflectionService<SqliteStorage, AnthropicClient> {
        ReflectionService::new(Arc::clone(&self.storage), Arc::clone(&self.client))
    }

    /// Growth plan service.
    #[must_use]
    pub fn growth_plans(&self) -> GrowthPlanService<SqliteStorage, AnthropicClient> {
        GrowthPlanService::new(Arc::clone(&self.storage), Arc::clone(&self.client))
    }

    /// Insight service.
    #[must_use]
    pub fn insights(&self) -> InsightService<AnthropicClient, QuranClient, ImageClient> {
        InsightService::new(
            Arc::clone(&self.client),
            Arc::clone(&self.quran),
            self.image.clone(),
        )
    }

    /// Daily reminder service.
    #[must_use]
    pub fn reminder_service(&self) -> ReminderService<AnthropicClient> {
        ReminderService::new(
            Arc::clone(&self.client),
            Arc::clone(&self.reminders),
            self.config.reminder_timeout_ms,
        )
    }

    /// Personalization service.
    #[must_use]
    pub fn personalization(&self) -> PersonalizationService<SqliteStorage> {
        PersonalizationService::new(Arc::clone(&self.storage))
    }

    /// Learning library service.
    #[must_use]
    pub fn learning(&self) -> LearningService<SqliteStorage> {
        LearningService::new(Arc::clone(&self.storage))
    }

    /// Habit service.
    #[must_use]
    pub fn habits(&self) -> HabitService<SqliteStorage> {
        HabitService::new(Arc::clone(&self.storage))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("image_enabled", &self.image.is_some())
            .field("cached_reminders", &self.reminders.len())
            .finish_non_exhaustive()
    }
}
