//! Personalized spiritual growth plans.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::core::{ask_model, generate_id, validate_optional_text, validate_text};
use super::personalization::settings_for;
use crate::error::ServiceError;
use crate::prompts::growth_plan_prompt;
use crate::storage::{FocusArea, GrowthPlan, PlanGoal, PlanStatus};
use crate::traits::{AnthropicClientTrait, StorageTrait};

/// Longest plan title.
pub const MAX_TITLE_LENGTH: usize = 200;
/// Longest plan description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;
/// Most goals a plan may hold.
pub const MAX_GOALS: usize = 20;
/// Longest goal title.
pub const MAX_GOAL_LENGTH: usize = 300;
/// Fewest goals accepted from a generated draft.
pub const MIN_GENERATED_GOALS: usize = 3;
/// Most goals kept from a generated draft.
pub const MAX_GENERATED_GOALS: usize = 7;

/// A plan together with its progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPlanView {
    /// The stored plan.
    #[serde(flatten)]
    pub plan: GrowthPlan,
    /// Completed goals / total goals.
    pub progress: f64,
}

impl From<GrowthPlan> for GrowthPlanView {
    fn from(plan: GrowthPlan) -> Self {
        let progress = plan.progress();
        Self { plan, progress }
    }
}

/// Full plan document (POST / PUT).
#[derive(Debug, Clone, Deserialize)]
pub struct GrowthPlanInput {
    /// Plan title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Area of practice.
    pub focus_area: FocusArea,
    /// Lifecycle status; `draft` when absent.
    #[serde(default)]
    pub status: PlanStatus,
    /// Goals in order.
    #[serde(default)]
    pub goals: Vec<PlanGoal>,
    /// Optional target date.
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial plan (PATCH). `target_date: null` clears the date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrowthPlanPatch {
    /// Plan title.
    pub title: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Area of practice.
    pub focus_area: Option<FocusArea>,
    /// Lifecycle status.
    pub status: Option<PlanStatus>,
    /// Goals in order.
    pub goals: Option<Vec<PlanGoal>>,
    /// Target date.
    #[serde(default, deserialize_with = "present")]
    pub target_date: Option<Option<NaiveDate>>,
}

/// Request for an AI drafted plan.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePlanRequest {
    /// Area of practice.
    pub focus_area: FocusArea,
    /// The user's own words about what they want.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlanDraft {
    title: String,
    #[serde(default)]
    description: String,
    goals: Vec<String>,
}

fn validate_plan(plan: &GrowthPlan) -> Result<(), ServiceError> {
    validate_text("title", &plan.title, MAX_TITLE_LENGTH)?;
    validate_optional_text("description", Some(&plan.description), MAX_DESCRIPTION_LENGTH)?;
    if plan.goals.len() > MAX_GOALS {
        return Err(ServiceError::invalid(
            "goals",
            format!("must have at most {MAX_GOALS} goals"),
        ));
    }
    for goal in &plan.goals {
        validate_text("goals", &goal.title, MAX_GOAL_LENGTH)?;
    }
    Ok(())
}

/// Mark goal `index` and derive the plan status.
///
/// Completing the last open goal of an active plan completes the plan;
/// reopening a goal of a completed plan makes it active again.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidValue`] for an index past the last goal.
pub fn apply_goal_completion(
    plan: &mut GrowthPlan,
    index: usize,
    completed: bool,
) -> Result<(), ServiceError> {
    let count = plan.goals.len();
    let goal = plan.goals.get_mut(index).ok_or_else(|| {
        ServiceError::invalid("index", format!("plan has {count} goals, got index {index}"))
    })?;
    goal.completed = completed;

    let all_done = plan.goals.iter().all(|g| g.completed);
    match plan.status {
        PlanStatus::Active if all_done => plan.status = PlanStatus::Completed,
        PlanStatus::Completed if !all_done => plan.status = PlanStatus::Active,
        _ => {}
    }
    Ok(())
}

/// Growth plan service.
pub struct GrowthPlanService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    storage: Arc<S>,
    client: Arc<C>,
}

impl<S, C> GrowthPlanService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    /// Create a growth plan service.
    #[must_use]
    pub const fn new(storage: Arc<S>, client: Arc<C>) -> Self {
        Self { storage, client }
    }

    /// Store a new plan.
    ///
    /// # Errors
    ///
    /// Returns validation or storage errors.
    pub async fn create(
        &self,
        user_id: &str,
        input: GrowthPlanInput,
    ) -> Result<GrowthPlanView, ServiceError> {
        let mut plan = GrowthPlan::new(generate_id(), user_id, input.title.trim(), input.focus_area)
            .with_description(input.description.trim())
            .with_goals(input.goals)
            .with_status(input.status);
        plan.target_date = input.target_date;
        validate_plan(&plan)?;

        self.storage.insert_growth_plan(&plan).await?;
        tracing::info!(user_id = %user_id, plan_id = %plan.id, "Created growth plan");
        Ok(plan.into())
    }

    /// A user's plans, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the query fails.
    pub async fn list(
        &self,
        user_id: &str,
        status: Option<PlanStatus>,
    ) -> Result<Vec<GrowthPlanView>, ServiceError> {
        let plans = self.storage.list_growth_plans(user_id, status).await?;
        Ok(plans.into_iter().map(GrowthPlanView::from).collect())
    }

    /// One plan.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the user has no such plan.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<GrowthPlanView, ServiceError> {
        self.load(user_id, id).await.map(GrowthPlanView::from)
    }

    async fn load(&self, user_id: &str, id: &str) -> Result<GrowthPlan, ServiceError> {
        self.storage
            .get_growth_plan(user_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "growth plan".to_string(),
                id: id.to_string(),
            })
    }

    async fn save(&self, mut plan: GrowthPlan) -> Result<GrowthPlanView, ServiceError> {
        validate_plan(&plan)?;
        plan.updated_at = Utc::now();
        self.storage.update_growth_plan(&plan).await?;
        tracing::info!(plan_id = %plan.id, status = plan.status.as_str(), "Updated growth plan");
        Ok(plan.into())
    }

    /// Overwrite every editable field.
    ///
    /// # Errors
    ///
    /// Returns validation errors or [`ServiceError::NotFound`].
    pub async fn replace(
        &self,
        user_id: &str,
        id: &str,
        input: GrowthPlanInput,
    ) -> Result<GrowthPlanView, ServiceError> {
        let mut plan = self.load(user_id, id).await?;
        plan.title = input.title.trim().to_string();
        plan.description = input.description.trim().to_string();
        plan.focus_area = input.focus_area;
        plan.status = input.status;
        plan.goals = input.goals;
        plan.target_date = input.target_date;
        self.save(plan).await
    }

    /// Change only the given fields.
    ///
    /// # Errors
    ///
    /// Returns validation errors or [`ServiceError::NotFound`].
    pub async fn patch(
        &self,
        user_id: &str,
        id: &str,
        patch: GrowthPlanPatch,
    ) -> Result<GrowthPlanView, ServiceError> {
        let mut plan = self.load(user_id, id).await?;
        if let Some(title) = patch.title {
            plan.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            plan.description = description.trim().to_string();
        }
        if let Some(focus_area) = patch.focus_area {
            plan.focus_area = focus_area;
        }
        if let Some(status) = patch.status {
            plan.status = status;
        }
        if let Some(goals) = patch.goals {
            plan.goals = goals;
        }
        if let Some(target_date) = patch.target_date {
            plan.target_date = target_date;
        }
        self.save(plan).await
    }

    /// Delete a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_growth_plan(user_id, id).await? {
            return Err(ServiceError::NotFound {
                resource: "growth plan".to_string(),
                id: id.to_string(),
            });
        }
        tracing::info!(user_id = %user_id, plan_id = %id, "Deleted growth plan");
        Ok(())
    }

    /// Mark one goal done or open again.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a bad index or
    /// [`ServiceError::NotFound`] for an unknown plan.
    pub async fn set_goal_completed(
        &self,
        user_id: &str,
        id: &str,
        index: usize,
        completed: bool,
    ) -> Result<GrowthPlanView, ServiceError> {
        let mut plan = self.load(user_id, id).await?;
        apply_goal_completion(&mut plan, index, completed)?;
        self.save(plan).await
    }

    /// Ask the model to draft a plan and store it as a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::JsonParseFailed`] when the draft is malformed
    /// or has fewer than three goals, and model or storage errors otherwise.
    pub async fn generate(
        &self,
        user_id: &str,
        request: GeneratePlanRequest,
    ) -> Result<GrowthPlanView, ServiceError> {
        validate_optional_text("notes", request.notes.as_deref(), MAX_DESCRIPTION_LENGTH)?;
        let settings = settings_for(self.storage.as_ref(), user_id).await?;

        let draft: PlanDraft = ask_model(
            self.client.as_ref(),
            growth_plan_prompt(request.focus_area, request.notes.as_deref(), &settings),
            1_500,
        )
        .await?;

        let goals: Vec<PlanGoal> = draft
            .goals
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .take(MAX_GENERATED_GOALS)
            .map(PlanGoal::new)
            .collect();
        if goals.len() < MIN_GENERATED_GOALS {
            return Err(ServiceError::JsonParseFailed {
                message: format!(
                    "Draft has {} goals, expected at least {MIN_GENERATED_GOALS}",
                    goals.len()
                ),
            });
        }

        let plan = GrowthPlan::new(generate_id(), user_id, draft.title.trim(), request.focus_area)
            .with_description(draft.description.trim())
            .with_goals(goals);
        validate_plan(&plan)?;

        self.storage.insert_growth_plan(&plan).await?;
        tracing::info!(
            user_id = %user_id,
            plan_id = %plan.id,
            focus = plan.focus_area.as_str(),
            goals = plan.goals.len(),
            "Generated growth plan"
        );
        Ok(plan.into())
    }
}

impl<S, C> std::fmt::Debug for GrowthPlanService<S, C>
where
    S: StorageTrait,
    C: AnthropicClientTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowthPlanService")
            .field("storage", &"<StorageTrait>")
            .field("client", &"<AnthropicClientTrait>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::traits::{
        CompletionResponse, MockAnthropicClientTrait, MockStorageTrait, Usage,
    };
    use pretty_assertions::assert_eq;

    fn plan_with_goals(status: PlanStatus, done: &[bool]) -> GrowthPlan {
        let goals = done
            .iter()
            .enumerate()
            .map(|(i, &completed)| PlanGoal {
                title: format!("goal {i}"),
                completed,
            })
            .collect();
        GrowthPlan::new("p-1", "u-1", "Plan", FocusArea::Prayer)
            .with_goals(goals)
            .with_status(status)
    }

    fn service(
        storage: MockStorageTrait,
        client: MockAnthropicClientTrait,
    ) -> GrowthPlanService<MockStorageTrait, MockAnthropicClientTrait> {
        GrowthPlanService::new(Arc::new(storage), Arc::new(client))
    }

    #[test]
    fn test_completing_last_goal_completes_active_plan() {
        let mut plan = plan_with_goals(PlanStatus::Active, &[true, false]);
        apply_goal_completion(&mut plan, 1, true).unwrap();
        assert_eq!(plan.status, PlanStatus::Completed);
        assert!((plan.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completing_goal_of_draft_keeps_status() {
        let mut plan = plan_with_goals(PlanStatus::Draft, &[false]);
        apply_goal_completion(&mut plan, 0, true).unwrap();
        assert_eq!(plan.status, PlanStatus::Draft);
    }

    #[test]
    fn test_reopening_goal_reactivates_plan() {
        let mut plan = plan_with_goals(PlanStatus::Completed, &[true, true]);
        apply_goal_completion(&mut plan, 0, false).unwrap();
        assert_eq!(plan.status, PlanStatus::Active);
        assert!((plan.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_index_out_of_range() {
        let mut plan = plan_with_goals(PlanStatus::Active, &[false]);
        let err = apply_goal_completion(&mut plan, 3, true).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidValue { field, .. } if field == "index"));
    }

    #[test]
    fn test_view_serializes_flat_with_progress() {
        let view = GrowthPlanView::from(plan_with_goals(
            PlanStatus::Active,
            &[true, false, false, false],
        ));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "p-1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["progress"], 0.25);
    }

    #[tokio::test]
    async fn test_create_validates_title() {
        let input: GrowthPlanInput =
            serde_json::from_str(r#"{"title": "  ", "focus_area": "prayer"}"#).unwrap();
        let err = service(MockStorageTrait::new(), MockAnthropicClientTrait::new())
            .create("u-1", input)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField { field } if field == "title"));
    }

    #[tokio::test]
    async fn test_create_defaults_to_draft() {
        let mut storage = MockStorageTrait::new();
        storage
            .expect_insert_growth_plan()
            .withf(|p| p.status == PlanStatus::Draft && p.user_id == "u-1")
            .returning(|_| Ok(()));

        let input: GrowthPlanInput = serde_json::from_str(
            r#"{"title": "Pray on time", "focus_area": "prayer", "goals": [{"title": "Fajr"}]}"#,
        )
        .unwrap();
        let view = service(storage, MockAnthropicClientTrait::new())
            .create("u-1", input)
            .await
            .unwrap();
        assert_eq!(view.plan.goals, vec![PlanGoal::new("Fajr")]);
        assert!(view.progress.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_set_goal_completed_persists_status() {
        let mut storage = MockStorageTrait::new();
        storage
            .expect_get_growth_plan()
            .returning(|_, _| Ok(Some(plan_with_goals(PlanStatus::Active, &[false]))));
        storage
            .expect_update_growth_plan()
            .withf(|p| p.status == PlanStatus::Completed && p.goals[0].completed)
            .times(1)
            .returning(|_| Ok(()));

        let view = service(storage, MockAnthropicClientTrait::new())
            .set_goal_completed("u-1", "p-1", 0, true)
            .await
            .unwrap();
        assert_eq!(view.plan.status, PlanStatus::Completed);
    }

    #[tokio::test]
    async fn test_patch_clears_target_date() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_growth_plan().returning(|_, _| {
            let mut plan = plan_with_goals(PlanStatus::Active, &[false]);
            plan.target_date = NaiveDate::from_ymd_opt(2026, 12, 31);
            Ok(Some(plan))
        });
        storage.expect_update_growth_plan().returning(|_| Ok(()));

        let patch: GrowthPlanPatch =
            serde_json::from_str(r#"{"target_date": null, "title": "Renamed"}"#).unwrap();
        let view = service(storage, MockAnthropicClientTrait::new())
            .patch("u-1", "p-1", patch)
            .await
            .unwrap();
        assert_eq!(view.plan.title, "Renamed");
        assert!(view.plan.target_date.is_none());
        assert_eq!(view.plan.status, PlanStatus::Active);
    }

    #[tokio::test]
    async fn test_get_other_users_plan_is_not_found() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_growth_plan().returning(|_, _| Ok(None));
        let err = service(storage, MockAnthropicClientTrait::new())
            .get("u-2", "p-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_generate_stores_draft_and_caps_goals() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_personalization().returning(|_| Ok(None));
        storage
            .expect_insert_growth_plan()
            .withf(|p| p.status == PlanStatus::Draft && p.goals.len() == MAX_GENERATED_GOALS)
            .times(1)
            .returning(|_| Ok(()));

        let mut client = MockAnthropicClientTrait::new();
        client.expect_complete().returning(|_, _| {
            Ok(CompletionResponse::new(
                r#"{"title": "Closer to the Quran", "description": "Daily recitation.",
                    "goals": ["1", "2", "3", "4", "5", "6", "7", "8", "9"]}"#,
                Usage::new(100, 100),
            ))
        });

        let view = service(storage, client)
            .generate(
                "u-1",
                GeneratePlanRequest {
                    focus_area: FocusArea::Quran,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(view.plan.focus_area, FocusArea::Quran);
        assert_eq!(view.plan.title, "Closer to the Quran");
    }

    #[tokio::test]
    async fn test_generate_rejects_short_draft() {
        let mut storage = MockStorageTrait::new();
        storage.expect_get_personalization().returning(|_| Ok(None));

        let mut client = MockAnthropicClientTrait::new();
        client.expect_complete().returning(|_, _| {
            Ok(CompletionResponse::new(
                r#"{"title": "Plan", "goals": ["only one", "  "]}"#,
                Usage::new(10, 10),
            ))
        });

        let err = service(storage, client)
            .generate(
                "u-1",
                GeneratePlanRequest {
                    focus_area: FocusArea::Charity,
                    notes: Some("give weekly".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::JsonParseFailed { .. }));
    }
}
