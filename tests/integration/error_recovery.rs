//! Error recovery and edge case tests.
//!
//! Tests how the services behave when providers fail and when callers
//! reach for records that are missing or belong to someone else.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use barakah::anthropic::{AnthropicClient, ClientConfig};
use barakah::error::ServiceError;
use barakah::services::{
    GrowthPlanInput, GrowthPlanService, HabitService, NewHabit, NewReflection, ReflectionService,
};
use barakah::storage::{AnalysisStatus, FocusArea, HabitCategory, Mood, PlanStatus, SqliteStorage};
use barakah::traits::StorageTrait;
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALICE: &str = "3f6c2a4e-8b1d-4c5e-9f7a-2b3c4d5e6f70";
const BILAL: &str = "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d";

/// Create a test database in a temporary directory.
async fn create_test_storage() -> (SqliteStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let storage = SqliteStorage::new(db_path.to_str().expect("Invalid path"))
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

fn anthropic_client(server: &MockServer) -> Arc<AnthropicClient> {
    let config = ClientConfig::new().with_base_url(server.uri());
    Arc::new(AnthropicClient::new("test-key", config).expect("Failed to create client"))
}

fn entry(content: &str) -> NewReflection {
    NewReflection {
        mood: Mood::Stressed,
        intensity: 8,
        content: content.into(),
    }
}

#[tokio::test]
#[serial]
async fn test_failed_analysis_keeps_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    let (storage, _temp_dir) = create_test_storage().await;
    let storage = Arc::new(storage);
    let service = ReflectionService::new(Arc::clone(&storage), anthropic_client(&server));

    // Create succeeds even though the analysis failed
    let created = service.create(ALICE, entry("Exams next week")).await.unwrap();
    assert_eq!(created.analysis_status, AnalysisStatus::Failed);
    assert!(created.analysis.is_none());

    let stored = storage
        .get_reflection(ALICE, &created.id)
        .await
        .unwrap()
        .expect("Expected stored reflection");
    assert_eq!(stored.analysis_status, AnalysisStatus::Failed);
    assert_eq!(stored.content, "Exams next week");

    // An explicit retry reports the failure
    let retry = service.analyze(ALICE, &created.id).await;
    assert!(matches!(retry, Err(ServiceError::ApiUnavailable { .. })));
}

#[tokio::test]
#[serial]
async fn test_retry_after_provider_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let analysis = json!({
        "summary": "Stress before exams.",
        "islamic_perspective": "Allah does not burden a soul beyond its capacity.",
        "verses": [{"reference": "2:286", "text": "God does not burden any human being with more than he is well able to bear"}],
        "practical_steps": ["Study after Fajr"]
    });
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_test",
            "content": [{"type": "text", "text": analysis.to_string()}],
            "model": "claude-test",
            "usage": {"input_tokens": 200, "output_tokens": 100},
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;
    let (storage, _temp_dir) = create_test_storage().await;
    let service = ReflectionService::new(Arc::new(storage), anthropic_client(&server));

    let created = service.create(ALICE, entry("Exams next week")).await.unwrap();
    assert_eq!(created.analysis_status, AnalysisStatus::Failed);

    let analyzed = service.analyze(ALICE, &created.id).await.unwrap();
    assert_eq!(analyzed.analysis_status, AnalysisStatus::Completed);
    let analysis = analyzed.analysis.expect("Expected analysis");
    assert!(analysis.hadith.is_none());
    assert_eq!(analysis.verses[0].reference, "2:286");
}

#[tokio::test]
#[serial]
async fn test_malformed_analysis_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_test",
            "content": [{"type": "text", "text": "{\"summary\": \"missing fields\"}"}],
            "model": "claude-test",
            "usage": {"input_tokens": 10, "output_tokens": 5},
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;
    let (storage, _temp_dir) = create_test_storage().await;
    let service = ReflectionService::new(Arc::new(storage), anthropic_client(&server));

    let created = service.create(ALICE, entry("Long day")).await.unwrap();
    assert_eq!(created.analysis_status, AnalysisStatus::Failed);

    let retry = service.analyze(ALICE, &created.id).await;
    assert!(matches!(retry, Err(ServiceError::JsonParseFailed { .. })));
}

#[tokio::test]
#[serial]
async fn test_records_invisible_to_other_users() {
    let server = MockServer::start().await;
    let (storage, _temp_dir) = create_test_storage().await;
    let storage = Arc::new(storage);
    let plans = GrowthPlanService::new(Arc::clone(&storage), anthropic_client(&server));
    let habits = HabitService::new(Arc::clone(&storage));

    let plan = plans
        .create(
            ALICE,
            GrowthPlanInput {
                title: "Tahajjud".into(),
                description: String::new(),
                focus_area: FocusArea::Prayer,
                status: PlanStatus::Active,
                goals: Vec::new(),
                target_date: None,
            },
        )
        .await
        .unwrap();
    let habit = habits
        .create(
            ALICE,
            NewHabit {
                name: "Witr".into(),
                category: HabitCategory::Prayer,
                target_per_day: 1,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        plans.get(BILAL, &plan.plan.id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        plans.delete(BILAL, &plan.plan.id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        habits.get(BILAL, &habit.id).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(plans.list(BILAL, None).await.unwrap().is_empty());

    // Still there for the owner
    assert!(plans.get(ALICE, &plan.plan.id).await.is_ok());
    assert!(habits.get(ALICE, &habit.id).await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_missing_records() {
    let server = MockServer::start().await;
    let (storage, _temp_dir) = create_test_storage().await;
    let service = ReflectionService::new(Arc::new(storage), anthropic_client(&server));

    assert!(matches!(
        service.get(ALICE, "nonexistent").await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.analyze(ALICE, "nonexistent").await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(ALICE, "nonexistent").await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
