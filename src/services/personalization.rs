//! Per-user personalization settings.

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

use super::core::{validate_list, validate_optional_text};
use crate::calendar::MAX_ADJUSTMENT_DAYS;
use crate::error::ServiceError;
use crate::storage::{
    PersonalizationSettings, SpiritualLevel, DEFAULT_LANGUAGE, DEFAULT_TRANSLATION,
};
use crate::traits::StorageTrait;

/// Most interests or goals a user may list.
pub const MAX_LIST_ENTRIES: usize = 20;
/// Longest interest or goal.
pub const MAX_ENTRY_LENGTH: usize = 100;
/// Longest display name.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Stored settings for `user_id`, or the defaults.
///
/// # Errors
///
/// Returns [`ServiceError::Storage`] when the lookup fails.
pub async fn settings_for<S>(
    storage: &S,
    user_id: &str,
) -> Result<PersonalizationSettings, ServiceError>
where
    S: StorageTrait + ?Sized,
{
    Ok(storage
        .get_personalization(user_id)
        .await?
        .unwrap_or_else(|| PersonalizationSettings::defaults_for(user_id)))
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_translation() -> String {
    DEFAULT_TRANSLATION.to_string()
}

/// Full settings document (PUT).
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsInput {
    /// Name to greet the user with.
    #[serde(default)]
    pub display_name: Option<String>,
    /// UI / content language code.
    #[serde(default = "default_language")]
    pub preferred_language: String,
    /// Quran translation edition identifier.
    #[serde(default = "default_translation")]
    pub translation_edition: String,
    /// Self-assessed level.
    #[serde(default)]
    pub spiritual_level: SpiritualLevel,
    /// Topics of interest.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Personal goals.
    #[serde(default)]
    pub goals: Vec<String>,
    /// Daily reminder time, `HH:MM`.
    #[serde(default)]
    pub reminder_time: Option<String>,
    /// Moon-sighting adjustment, -2..=2.
    #[serde(default)]
    pub hijri_adjustment_days: i8,
}

/// Deserialize a present field as `Some`, so `null` can clear a value.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial settings (PATCH). `null` clears the optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    /// Name to greet the user with.
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
    /// UI / content language code.
    pub preferred_language: Option<String>,
    /// Quran translation edition identifier.
    pub translation_edition: Option<String>,
    /// Self-assessed level.
    pub spiritual_level: Option<SpiritualLevel>,
    /// Topics of interest.
    pub interests: Option<Vec<String>>,
    /// Personal goals.
    pub goals: Option<Vec<String>>,
    /// Daily reminder time, `HH:MM`.
    #[serde(default, deserialize_with = "present")]
    pub reminder_time: Option<Option<String>>,
    /// Moon-sighting adjustment, -2..=2.
    pub hijri_adjustment_days: Option<i8>,
}

/// Check a `HH:MM` 24-hour time.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidValue`] for anything else.
pub fn validate_reminder_time(value: &str) -> Result<(), ServiceError> {
    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(ServiceError::invalid(
            "reminder_time",
            format!("'{value}' is not a 24-hour HH:MM time"),
        ))
    }
}

fn validate_code(field: &str, value: &str) -> Result<(), ServiceError> {
    let valid = !value.is_empty()
        && value.len() <= 40
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ServiceError::invalid(
            field,
            format!("'{value}' is not a valid identifier"),
        ))
    }
}

/// Validate a complete settings record.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidValue`] naming the first offending field.
pub fn validate_settings(settings: &PersonalizationSettings) -> Result<(), ServiceError> {
    validate_optional_text(
        "display_name",
        settings.display_name.as_deref(),
        MAX_DISPLAY_NAME_LENGTH,
    )?;
    validate_code("preferred_language", &settings.preferred_language)?;
    validate_code("translation_edition", &settings.translation_edition)?;
    validate_list("interests", &settings.interests, MAX_LIST_ENTRIES, MAX_ENTRY_LENGTH)?;
    validate_list("goals", &settings.goals, MAX_LIST_ENTRIES, MAX_ENTRY_LENGTH)?;
    if let Some(time) = &settings.reminder_time {
        validate_reminder_time(time)?;
    }
    if i64::from(settings.hijri_adjustment_days).abs() > MAX_ADJUSTMENT_DAYS {
        return Err(ServiceError::invalid(
            "hijri_adjustment_days",
            format!(
                "must be between -{MAX_ADJUSTMENT_DAYS} and {MAX_ADJUSTMENT_DAYS}, got {}",
                settings.hijri_adjustment_days
            ),
        ));
    }
    Ok(())
}

/// Personalization service.
pub struct PersonalizationService<S>
where
    S: StorageTrait,
{
    storage: Arc<S>,
}

impl<S> PersonalizationService<S>
where
    S: StorageTrait,
{
    /// Create a personalization service.
    #[must_use]
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Stored settings or defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the lookup fails.
    pub async fn get(&self, user_id: &str) -> Result<PersonalizationSettings, ServiceError> {
        settings_for(self.storage.as_ref(), user_id).await
    }

    /// Replace all settings.
    ///
    /// # Errors
    ///
    /// Returns validation or storage errors.
    pub async fn upsert(
        &self,
        user_id: &str,
        input: SettingsInput,
    ) -> Result<PersonalizationSettings, ServiceError> {
        let settings = PersonalizationSettings {
            user_id: user_id.to_string(),
            display_name: input.display_name,
            preferred_language: input.preferred_language,
            translation_edition: input.translation_edition,
            spiritual_level: input.spiritual_level,
            interests: input.interests,
            goals: input.goals,
            reminder_time: input.reminder_time,
            hijri_adjustment_days: input.hijri_adjustment_days,
            updated_at: Utc::now(),
        };
        self.save(settings).await
    }

    /// Change only the given fields.
    ///
    /// # Errors
    ///
    /// Returns validation or storage errors.
    pub async fn patch(
        &self,
        user_id: &str,
        patch: SettingsPatch,
    ) -> Result<PersonalizationSettings, ServiceError> {
        let mut settings = self.get(user_id).await?;

        if let Some(display_name) = patch.display_name {
            settings.display_name = display_name;
        }
        if let Some(language) = patch.preferred_language {
            settings.preferred_language = language;
        }
        if let Some(edition) = patch.translation_edition {
            settings.translation_edition = edition;
        }
        if let Some(level) = patch.spiritual_level {
            settings.spiritual_level = level;
        }
        if let Some(interests) = patch.interests {
            settings.interests = interests;
        }
        if let Some(goals) = patch.goals {
            settings.goals = goals;
        }
        if let Some(reminder_time) = patch.reminder_time {
            settings.reminder_time = reminder_time;
        }
        if let Some(adjustment) = patch.hijri_adjustment_days {
            settings.hijri_adjustment_days = adjustment;
        }
        settings.updated_at = Utc::now();

        self.save(settings).await
    }

    /// Forget stored settings and return the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the delete fails.
    pub async fn reset(&self, user_id: &str) -> Result<PersonalizationSettings, ServiceError> {
        let removed = self.storage.delete_personalization(user_id).await?;
        tracing::info!(user_id = %user_id, removed, "Reset personalization");
        Ok(PersonalizationSettings::defaults_for(user_id))
    }

    async fn save(
        &self,
        settings: PersonalizationSettings,
    ) -> Result<PersonalizationSettings, ServiceError> {
        validate_settings(&settings)?;
        self.storage.upsert_personalization(&settings).await?;
        tracing::info!(user_id = %settings.user_id, "Saved personalization");
        Ok(settings)
    }
}

impl<S> std::fmt::Debug for PersonalizationService<S>
where
    S: StorageTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalizationService")
            .field("storage", &"<StorageTrait>")
            .finish()
    }
}
