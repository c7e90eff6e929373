//! Growth plan workflow tests.
//!
//! Tests the plan lifecycle:
//! 1. Create an active plan with goals
//! 2. Complete goals one by one (plan completes with the last)
//! 3. Reopen a goal (plan becomes active again)
//! 4. Patch and replace
//! 5. Generate a draft with the model

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use barakah::anthropic::{AnthropicClient, ClientConfig};
use barakah::error::ServiceError;
use barakah::services::{GeneratePlanRequest, GrowthPlanInput, GrowthPlanPatch, GrowthPlanService};
use barakah::storage::{FocusArea, PlanGoal, PlanStatus, SqliteStorage};
use chrono::NaiveDate;
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "3f6c2a4e-8b1d-4c5e-9f7a-2b3c4d5e6f70";

/// Create a test database in a temporary directory.
async fn create_test_storage() -> (SqliteStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let storage = SqliteStorage::new(db_path.to_str().expect("Invalid path"))
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

async fn service(
    server: &MockServer,
) -> (GrowthPlanService<SqliteStorage, AnthropicClient>, TempDir) {
    let (storage, temp_dir) = create_test_storage().await;
    let config = ClientConfig::new().with_base_url(server.uri());
    let client = AnthropicClient::new("test-key", config).expect("Failed to create client");
    (GrowthPlanService::new(Arc::new(storage), Arc::new(client)), temp_dir)
}

fn model_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_test",
        "content": [{"type": "text", "text": text}],
        "model": "claude-test",
        "usage": {"input_tokens": 150, "output_tokens": 120},
        "stop_reason": "end_turn"
    }))
}

fn input(title: &str, status: PlanStatus, goals: &[&str]) -> GrowthPlanInput {
    GrowthPlanInput {
        title: title.into(),
        description: "Build consistency".into(),
        focus_area: FocusArea::Prayer,
        status,
        goals: goals.iter().map(|g| PlanGoal::new(*g)).collect(),
        target_date: NaiveDate::from_ymd_opt(2024, 12, 31),
    }
}

#[tokio::test]
#[serial]
async fn test_goal_completion_drives_status() {
    let server = MockServer::start().await;
    let (service, _temp_dir) = service(&server).await;

    let plan = service
        .create(
            USER,
            input(
                "Pray on time",
                PlanStatus::Active,
                &["Fajr on time", "Isha in congregation"],
            ),
        )
        .await
        .unwrap();
    assert_eq!(plan.progress, 0.0);
    let id = plan.plan.id.clone();

    let half = service.set_goal_completed(USER, &id, 0, true).await.unwrap();
    assert_eq!(half.plan.status, PlanStatus::Active);
    assert_eq!(half.progress, 0.5);

    let done = service.set_goal_completed(USER, &id, 1, true).await.unwrap();
    assert_eq!(done.plan.status, PlanStatus::Completed);
    assert_eq!(done.progress, 1.0);

    // Reopening a goal reactivates the plan
    let reopened = service.set_goal_completed(USER, &id, 1, false).await.unwrap();
    assert_eq!(reopened.plan.status, PlanStatus::Active);

    let stored = service.get(USER, &id).await.unwrap();
    assert_eq!(stored.plan.status, PlanStatus::Active);
    assert!(stored.plan.goals[0].completed);
    assert!(!stored.plan.goals[1].completed);

    let out_of_range = service.set_goal_completed(USER, &id, 2, true).await;
    assert!(
        matches!(out_of_range, Err(ServiceError::InvalidValue { field, .. }) if field == "index")
    );
}

#[tokio::test]
#[serial]
async fn test_draft_plan_does_not_auto_complete() {
    let server = MockServer::start().await;
    let (service, _temp_dir) = service(&server).await;

    let plan = service
        .create(USER, input("Read daily", PlanStatus::Draft, &["One page"]))
        .await
        .unwrap();
    let done = service
        .set_goal_completed(USER, &plan.plan.id, 0, true)
        .await
        .unwrap();

    assert_eq!(done.plan.status, PlanStatus::Draft);
    assert_eq!(done.progress, 1.0);
}

#[tokio::test]
#[serial]
async fn test_patch_replace_list_delete() {
    let server = MockServer::start().await;
    let (service, _temp_dir) = service(&server).await;

    let plan = service
        .create(USER, input("Charity", PlanStatus::Active, &["Give weekly"]))
        .await
        .unwrap();
    let id = plan.plan.id.clone();
    service
        .create(USER, input("Later", PlanStatus::Paused, &[]))
        .await
        .unwrap();

    let patch: GrowthPlanPatch =
        serde_json::from_value(json!({"title": "Weekly charity", "target_date": null})).unwrap();
    let patched = service.patch(USER, &id, patch).await.unwrap();
    assert_eq!(patched.plan.title, "Weekly charity");
    assert_eq!(patched.plan.target_date, None);
    assert_eq!(patched.plan.goals.len(), 1);

    let replaced = service
        .replace(USER, &id, input("Quran", PlanStatus::Active, &["Juz a week", "Tafsir"]))
        .await
        .unwrap();
    assert_eq!(replaced.plan.title, "Quran");
    assert_eq!(replaced.plan.goals.len(), 2);

    let active = service.list(USER, Some(PlanStatus::Active)).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(service.list(USER, None).await.unwrap().len(), 2);

    service.delete(USER, &id).await.unwrap();
    assert!(matches!(
        service.get(USER, &id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(USER, &id).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
#[serial]
async fn test_generate_draft_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(model_reply(
            r#"Here is your plan:
{"title": "Steady dhikr", "description": "Small daily remembrance", "goals": ["Morning adhkar", "  ", "Evening adhkar", "100 istighfar"]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    let (service, _temp_dir) = service(&server).await;

    let plan = service
        .generate(
            USER,
            GeneratePlanRequest {
                focus_area: FocusArea::Dhikr,
                notes: Some("I forget in the afternoons".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(plan.plan.status, PlanStatus::Draft);
    assert_eq!(plan.plan.focus_area, FocusArea::Dhikr);
    assert_eq!(plan.plan.title, "Steady dhikr");
    assert_eq!(plan.plan.goals.len(), 3);
    assert!(plan.plan.goals.iter().all(|g| !g.completed));

    let stored = service.get(USER, &plan.plan.id).await.unwrap();
    assert_eq!(stored.plan.goals, plan.plan.goals);
}

#[tokio::test]
#[serial]
async fn test_generate_rejects_thin_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(model_reply(
            r#"{"title": "Fast", "description": "", "goals": ["Monday fasts"]}"#,
        ))
        .mount(&server)
        .await;
    let (service, _temp_dir) = service(&server).await;

    let result = service
        .generate(
            USER,
            GeneratePlanRequest {
                focus_area: FocusArea::Fasting,
                notes: None,
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::JsonParseFailed { .. })));
    assert!(service.list(USER, None).await.unwrap().is_empty());
}
