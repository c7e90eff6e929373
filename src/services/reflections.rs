//! Mood-based self-reflection with AI analysis.
//!
//! An entry is stored as `pending`, then the model is asked for an analysis.
//! The entry survives a failed analysis with status `failed` and can be
//! analyzed again later.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::core::{ask_model, generate_id, validate_text};
use super::personalization::settings_for;
use crate::error::ServiceError;
use crate::prompts::reflection_analysis_prompt;
use crate::storage::{
    AnalysisStatus, Mood, ReflectionAnalysis, ReflectionFilter, SelfReflection,
};
use crate::traits::{AnthropicClientTrait, StorageTrait};

/// Longest accepted reflection, in characters.
pub const MAX_REFLECTION_LENGTH: usize = 5_000;
/// Default page size for listings.
pub const DEFAULT_LIST_LIMIT: u32 = 20;
/// Largest page size for listings.
pub const MAX_LIST_LIMIT: u32 = 100;
/// Longest window for a mood summary, in days.
pub const MAX_SUMMARY_DAYS: u32 = 365;

/// Fields of a new reflection.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReflection {
    /// How the user feels.
    pub mood: Mood,
    /// Strength of the feeling, 1-10.
    pub intensity: u8,
    /// Free text.
    pub content: String,
}

/// Changes to a reflection; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectionUpdate {
    /// New mood.
    pub mood: Option<Mood>,
    /// New intensity, 1-10.
    pub intensity: Option<u8>,
    /// New text; resets the analysis.
    pub content: Option<String>,
}

/// Entries for one mood in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    /// The mood.
    pub mood: Mood,
    /// Number of entries.
    pub count: u32,
}

/// Mood distribution over a recent window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    /// Window length in days.
    pub days: u32,
    /// Entries in the window.
    pub total: u32,
    /// Mean intensity, absent when there are no entries.
    pub average_intensity: Option<f64>,
    /// Most frequent mood; ties go to the earlier mood in [`Mood::ALL`].
    pub dominant_mood: Option<Mood>,
    /// Non-zero counts in [`Mood::ALL`] order.
    pub moods: Vec<MoodCount>,
}

fn validate_intensity(intensity: u8) -> Result<(), ServiceError> {
    if (1..=10).contains(&intensity) {
        Ok(())
    } else {
        Err(ServiceError::invalid(
            "intensity",
            format!("must be between 1 and 10, got {intensity}"),
        ))
    }
}

/// Summarize moods of `reflections` over a `days`-long window.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn summarize_moods(reflections: &[SelfReflection], days: u32) -> MoodSummary {
    let mut counts: HashMap<Mood, u32> = HashMap::new();
    for reflection in reflections {
        *counts.entry(reflection.mood).or_default() += 1;
    }

    let moods: Vec<MoodCount> = Mood::ALL
        .iter()
        .filter_map(|mood| {
            counts.get(mood).map(|&count| MoodCount {
                mood: *mood,
                count,
            })
        })
        .collect();

    let dominant_mood = moods
        .iter()
        .fold(None::<&MoodCount>, |best, current| match best {
            Some(b) if b.count >= current.count => Some(b),
            _ => Some(current),
        })
        .map(|m| m.mood);

    let total = reflections.len() as u32;
    let average_intensity = (total > 0).then(|| {
        let sum: u32 = reflections.iter().map(|r| u32::from(r.intensity)).sum();
        f64::from(sum) / f64::from(total)
    });

    MoodSummary {
        days,
        total,
        average_intensity,
        dominant_mood,
        moods,
    }
}

/// Self-reflection service.
pub struct ReflectionService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    storage: Arc<S>,
    client: Arc<C>,
}

impl<S, C> ReflectionService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    /// Create a reflection service.
    #[must_use]
    pub const fn new(storage: Arc<S>, client: Arc<C>) -> Self {
        Self { storage, client }
    }

    /// Store a new reflection and analyze it.
    ///
    /// The stored entry is returned even when the analysis fails; its
    /// status is then `failed`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input and
    /// [`ServiceError::Storage`] when persistence fails.
    pub async fn create(
        &self,
        user_id: &str,
        input: NewReflection,
    ) -> Result<SelfReflection, ServiceError> {
        validate_text("content", &input.content, MAX_REFLECTION_LENGTH)?;
        validate_intensity(input.intensity)?;

        let reflection = SelfReflection::new(
            generate_id(),
            user_id,
            input.mood,
            input.intensity,
            input.content.trim(),
        );
        self.storage.insert_reflection(&reflection).await?;

        tracing::info!(
            user_id = %user_id,
            reflection_id = %reflection.id,
            mood = reflection.mood.as_str(),
            "Created reflection"
        );

        let (reflection, outcome) = self.run_analysis(reflection).await?;
        if let Err(e) = outcome {
            tracing::warn!(
                reflection_id = %reflection.id,
                error = %e,
                "Reflection analysis failed"
            );
        }
        Ok(reflection)
    }

    /// Run the analysis again for an existing reflection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown entry, or the model
    /// error after recording the entry as `failed`.
    pub async fn analyze(&self, user_id: &str, id: &str) -> Result<SelfReflection, ServiceError> {
        let reflection = self.get(user_id, id).await?;
        let (reflection, outcome) = self.run_analysis(reflection).await?;
        outcome?;
        Ok(reflection)
    }

    /// Ask the model and persist the result; the inner result carries the
    /// model outcome, the outer one storage failures.
    async fn run_analysis(
        &self,
        mut reflection: SelfReflection,
    ) -> Result<(SelfReflection, Result<(), ServiceError>), ServiceError> {
        let settings = settings_for(self.storage.as_ref(), &reflection.user_id).await?;
        let outcome: Result<ReflectionAnalysis, ServiceError> = ask_model(
            self.client.as_ref(),
            reflection_analysis_prompt(&reflection, &settings),
            1_500,
        )
        .await;

        let outcome = match outcome {
            Ok(analysis) => {
                reflection.analysis = Some(analysis);
                reflection.analysis_status = AnalysisStatus::Completed;
                Ok(())
            }
            Err(e) => {
                reflection.analysis = None;
                reflection.analysis_status = AnalysisStatus::Failed;
                Err(e)
            }
        };
        reflection.updated_at = Utc::now();
        self.storage.update_reflection(&reflection).await?;

        tracing::debug!(
            reflection_id = %reflection.id,
            status = reflection.analysis_status.as_str(),
            "Stored reflection analysis"
        );

        Ok((reflection, outcome))
    }

    /// Newest reflections first, optionally by mood.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a limit outside 1-100.
    pub async fn list(
        &self,
        user_id: &str,
        limit: Option<u32>,
        mood: Option<Mood>,
    ) -> Result<Vec<SelfReflection>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(ServiceError::invalid(
                "limit",
                format!("must be between 1 and {MAX_LIST_LIMIT}"),
            ));
        }
        Ok(self
            .storage
            .list_reflections(user_id, &ReflectionFilter { limit, mood })
            .await?)
    }

    /// One reflection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the user has no such entry.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<SelfReflection, ServiceError> {
        self.storage
            .get_reflection(user_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "reflection".to_string(),
                id: id.to_string(),
            })
    }

    /// Apply changes; a new text discards the previous analysis.
    ///
    /// # Errors
    ///
    /// Returns validation errors or [`ServiceError::NotFound`].
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        changes: ReflectionUpdate,
    ) -> Result<SelfReflection, ServiceError> {
        let mut reflection = self.get(user_id, id).await?;

        if let Some(mood) = changes.mood {
            reflection.mood = mood;
        }
        if let Some(intensity) = changes.intensity {
            validate_intensity(intensity)?;
            reflection.intensity = intensity;
        }
        if let Some(content) = changes.content {
            validate_text("content", &content, MAX_REFLECTION_LENGTH)?;
            let content = content.trim().to_string();
            if content != reflection.content {
                reflection.content = content;
                reflection.analysis = None;
                reflection.analysis_status = AnalysisStatus::Pending;
            }
        }

        reflection.updated_at = Utc::now();
        self.storage.update_reflection(&reflection).await?;
        tracing::info!(user_id = %user_id, reflection_id = %id, "Updated reflection");
        Ok(reflection)
    }

    /// Delete a reflection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_reflection(user_id, id).await? {
            return Err(ServiceError::NotFound {
                resource: "reflection".to_string(),
                id: id.to_string(),
            });
        }
        tracing::info!(user_id = %user_id, reflection_id = %id, "Deleted reflection");
        Ok(())
    }

    /// Mood counts and average intensity over the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a window outside 1-365.
    pub async fn mood_summary(
        &self,
        user_id: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<MoodSummary, ServiceError> {
        if !(1..=MAX_SUMMARY_DAYS).contains(&days) {
            return Err(ServiceError::invalid(
                "days",
                format!("must be between 1 and {MAX_SUMMARY_DAYS}"),
            ));
        }
        let since = now - Duration::days(i64::from(days));
        let reflections = self.storage.reflections_since(user_id, since).await?;
        Ok(summarize_moods(&reflections, days))
    }
}

impl<S, C> std::fmt::Debug for ReflectionService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectionService")
            .field("storage", &"<StorageTrait>")
            .field("client", &"<AnthropicClientTrait>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::test_utils::{mock_anthropic_error, mock_anthropic_success};
    use crate::traits::{MockAnthropicClientTrait, MockStorageTrait};
    use pretty_assertions::assert_eq;

    const ANALYSIS: &str = r#"{
        "summary": "You feel anxious about exams.",
        "islamic_perspective": "Tawakkul means doing your part and trusting Allah.",
        "verses": [{"reference": "65:3", "text": "And whoever relies upon Allah, He is sufficient for him."}],
        "hadith": null,
        "dua": "Rabbi zidni ilma",
        "practical_steps": ["Make a study plan", "Pray two rakat before studying"]
    }"#;

    fn storage_accepting_writes() -> MockStorageTrait {
        let mut storage = MockStorageTrait::new();
        storage.expect_insert_reflection().returning(|_| Ok(()));
        storage.expect_update_reflection().returning(|_| Ok(()));
        storage.expect_get_personalization().returning(|_| Ok(None));
        storage
    }

    fn client_replying(body: &'static str) -> MockAnthropicClientTrait {
        mock_anthropic_success(body, 100, 200)
    }

    fn failing_client() -> MockAnthropicClientTrait {
        mock_anthropic_error(ServiceError::ApiUnavailable {
            message: "overloaded".into(),
        })
    }

    fn new_reflection(content: &str, intensity: u8) -> NewReflection {
        NewReflection {
            mood: Mood::Anxious,
            intensity,
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_create_completes_analysis() {
        let service = ReflectionService::new(
            Arc::new(storage_accepting_writes()),
            Arc::new(client_replying(ANALYSIS)),
        );

        let reflection = service
            .create("u-1", new_reflection("  Exams next week  ", 7))
            .await
            .unwrap();

        assert_eq!(reflection.content, "Exams next week");
        assert_eq!(reflection.analysis_status, AnalysisStatus::Completed);
        let analysis = reflection.analysis.unwrap();
        assert_eq!(analysis.verses[0].reference, "65:3");
        assert_eq!(analysis.practical_steps.len(), 2);
        assert!(analysis.hadith.is_none());
    }

    #[tokio::test]
    async fn test_create_keeps_entry_when_analysis_fails() {
        let mut storage = MockStorageTrait::new();
        storage.expect_insert_reflection().times(1).returning(|_| Ok(()));
        storage.expect_get_personalization().returning(|_| Ok(None));
        storage
            .expect_update_reflection()
            .withf(|r| r.analysis_status == AnalysisStatus::Failed && r.analysis.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let service = ReflectionService::new(Arc::new(storage), Arc::new(failing_client()));
        let reflection = service
            .create("u-1", new_reflection("Feeling low", 4))
            .await
            .unwrap();

        assert_eq!(reflection.analysis_status, AnalysisStatus::Failed);
    }

    #[tokio::test]
    async fn test_create_malformed_analysis_marks_failed() {
        let service = ReflectionService::new(
            Arc::new(storage_accepting_writes()),
            Arc::new(client_replying("Sorry, I can't do that.")),
        );
        let reflection = service
            .create("u-1", new_reflection("text", 5))
            .await
            .unwrap();
        assert_eq!(reflection.analysis_status, AnalysisStatus::Failed);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = ReflectionService::new(
            Arc::new(MockStorageTrait::new()),
            Arc::new(MockAnthropicClientTrait::new()),
        );

        let err = service
            .create("u-1", new_reflection("", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField { .. }));

        let err = service
            .create("u-1", new_reflection("ok", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidValue { field, .. } if field == "intensity"));

        let err = service
            .create("u-1", new_reflection("ok", 11))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidValue { .. }));

        let long = "a".repeat(MAX_REFLECTION_LENGTH + 1);
        let err = service
            .create("u-1", new_reflection(&long, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidValue { field, .. } if field == "content"));
    }

    #[tokio::test]
    async fn test_create_storage_failure() {
        let mut storage = MockStorageTrait::new();
        storage.expect_insert_reflection().returning(|_| {
            Err(StorageError::ConnectionFailed {
                message: "closed".into(),
            })
        });
        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));

        let err = service
            .create("u-1", new_reflection("text", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_analyze_failure_is_error() {
        let mut storage = storage_accepting_writes();
        storage
            .expect_get_reflection()
            .returning(|user, id| Ok(Some(SelfReflection::new(id, user, Mood::Sad, 3, "text"))));

        let service = ReflectionService::new(Arc::new(storage), Arc::new(failing_client()));
        let err = service.analyze("u-1", "r-1").await.unwrap_err();
        assert!(matches!(err, ServiceError::ApiUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_analyze_unknown_entry() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_reflection().returning(|_, _| Ok(None));
        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));

        let err = service.analyze("u-1", "missing").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound {
                resource: "reflection".into(),
                id: "missing".into()
            }
        );
    }

    #[tokio::test]
    async fn test_update_content_resets_analysis() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_reflection().returning(|user, id| {
            let mut r = SelfReflection::new(id, user, Mood::Sad, 3, "old text");
            r.analysis_status = AnalysisStatus::Completed;
            Ok(Some(r))
        });
        storage
            .expect_update_reflection()
            .withf(|r| r.analysis_status == AnalysisStatus::Pending && r.content == "new text")
            .returning(|_| Ok(()));

        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));
        let updated = service
            .update(
                "u-1",
                "r-1",
                ReflectionUpdate {
                    content: Some("new text".into()),
                    ..ReflectionUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mood, Mood::Sad);
    }

    #[tokio::test]
    async fn test_update_mood_keeps_analysis() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_reflection().returning(|user, id| {
            let mut r = SelfReflection::new(id, user, Mood::Sad, 3, "text");
            r.analysis_status = AnalysisStatus::Completed;
            Ok(Some(r))
        });
        storage.expect_update_reflection().returning(|_| Ok(()));

        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));
        let updated = service
            .update(
                "u-1",
                "r-1",
                ReflectionUpdate {
                    mood: Some(Mood::Hopeful),
                    content: Some("text".into()),
                    ..ReflectionUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mood, Mood::Hopeful);
        assert_eq!(updated.analysis_status, AnalysisStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut storage = MockStorageTrait::new();
        storage.expect_delete_reflection().returning(|_, _| Ok(false));
        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));
        assert!(matches!(
            service.delete("u-1", "r-1").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_limit_validation() {
        let service = ReflectionService::new(
            Arc::new(MockStorageTrait::new()),
            Arc::new(MockAnthropicClientTrait::new()),
        );
        assert!(service.list("u-1", Some(0), None).await.is_err());
        assert!(service.list("u-1", Some(101), None).await.is_err());
    }

    #[tokio::test]
    async fn test_mood_summary_window() {
        let now = Utc::now();
        let mut storage = MockStorageTrait::new();
        storage
            .expect_reflections_since()
            .withf(move |user, since| user == "u-1" && *since == now - Duration::days(7))
            .returning(|user, _| {
                Ok(vec![
                    SelfReflection::new("a", user, Mood::Grateful, 8, "x"),
                    SelfReflection::new("b", user, Mood::Anxious, 6, "x"),
                    SelfReflection::new("c", user, Mood::Anxious, 4, "x"),
                ])
            });

        let service =
            ReflectionService::new(Arc::new(storage), Arc::new(MockAnthropicClientTrait::new()));
        let summary = service.mood_summary("u-1", 7, now).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.average_intensity, Some(6.0));
        assert_eq!(summary.dominant_mood, Some(Mood::Anxious));
        assert_eq!(
            summary.moods,
            vec![
                MoodCount {
                    mood: Mood::Grateful,
                    count: 1
                },
                MoodCount {
                    mood: Mood::Anxious,
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_mood_summary_rejects_window() {
        let service = ReflectionService::new(
            Arc::new(MockStorageTrait::new()),
            Arc::new(MockAnthropicClientTrait::new()),
        );
        assert!(service.mood_summary("u-1", 0, Utc::now()).await.is_err());
        assert!(service.mood_summary("u-1", 366, Utc::now()).await.is_err());
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_moods(&[], 30);
        assert_eq!(summary.total, 0);
        assert!(summary.average_intensity.is_none());
        assert!(summary.dominant_mood.is_none());
        assert!(summary.moods.is_empty());
    }

    #[test]
    fn test_summarize_tie_prefers_earlier_mood() {
        let reflections = vec![
            SelfReflection::new("a", "u", Mood::Sad, 5, "x"),
            SelfReflection::new("b", "u", Mood::Happy, 5, "x"),
        ];
        assert_eq!(summarize_moods(&reflections, 7).dominant_mood, Some(Mood::Happy));
    }
}
