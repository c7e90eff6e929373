//! Self-reflection workflow tests.
//!
//! Tests the complete reflection lifecycle:
//! 1. Create entry (analysis runs immediately)
//! 2. Edit the text (analysis resets to pending)
//! 3. Re-run the analysis
//! 4. Summarize moods over a window
//! 5. Delete

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use barakah::anthropic::{AnthropicClient, ClientConfig};
use barakah::error::ServiceError;
use barakah::services::{NewReflection, ReflectionService, ReflectionUpdate};
use barakah::storage::{AnalysisStatus, Mood, SqliteStorage};
use chrono::Utc;
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

fn anthropic_client(server: &MockServer) -> AnthropicClient {
    let config = ClientConfig::new().with_base_url(server.uri());
    AnthropicClient::new("test-key", config).expect("Failed to create client")
}

fn analysis_reply(summary: &str) -> serde_json::Value {
    let analysis = json!({
        "summary": summary,
        "islamic_perspective": "Worry is eased by remembrance of Allah.",
        "verses": [{"reference": "13:28", "text": "Verily, in the remembrance of God hearts find rest"}],
        "hadith": "No fatigue, illness, anxiety or sorrow befalls a Muslim except that Allah expiates some of his sins (Bukhari)",
        "dua": "Allahumma inni a'udhu bika minal-hammi wal-hazan",
        "practical_steps": ["Pray two rakat", "Write down three blessings"]
    });
    json!({
        "id": "msg_test",
        "content": [{"type": "text", "text": analysis.to_string()}],
        "model": "claude-test",
        "usage": {"input_tokens": 200, "output_tokens": 150},
        "stop_reason": "end_turn"
    })
}

async fn service(
    server: &MockServer,
) -> (ReflectionService<SqliteStorage, AnthropicClient>, TempDir) {
    let (storage, temp_dir) = create_test_storage().await;
    let service = ReflectionService::new(Arc::new(storage), Arc::new(anthropic_client(server)));
    (service, temp_dir)
}

#[tokio::test]
#[serial]
async fn test_reflection_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(analysis_reply("You feel uneasy about work.")),
        )
        .expect(2)
        .mount(&server)
        .await;
    let (service, _temp_dir) = service(&server).await;

    // Create: analysis is produced and stored
    let created = service
        .create(
            USER,
            NewReflection {
                mood: Mood::Anxious,
                intensity: 7,
                content: "  Worried about the deadline at work  ".into(),
            },
        )
        .await
        .expect("Failed to create reflection");

    assert_eq!(created.content, "Worried about the deadline at work");
    assert_eq!(created.analysis_status, AnalysisStatus::Completed);
    let analysis = created.analysis.as_ref().expect("Expected analysis");
    assert_eq!(analysis.verses[0].reference, "13:28");
    assert_eq!(analysis.practical_steps.len(), 2);

    // Stored copy matches
    let stored = service.get(USER, &created.id).await.unwrap();
    assert_eq!(stored.analysis_status, AnalysisStatus::Completed);
    assert_eq!(stored.analysis, created.analysis);

    // Editing the text resets the analysis
    let edited = service
        .update(
            USER,
            &created.id,
            ReflectionUpdate {
                content: Some("Worried, but I made a plan".into()),
                intensity: Some(4),
                ..ReflectionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.analysis_status, AnalysisStatus::Pending);
    assert!(edited.analysis.is_none());
    assert_eq!(edited.intensity, 4);

    // Re-analyze
    let analyzed = service.analyze(USER, &created.id).await.unwrap();
    assert_eq!(analyzed.analysis_status, AnalysisStatus::Completed);

    // Delete
    service.delete(USER, &created.id).await.unwrap();
    let result = service.get(USER, &created.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn test_mood_only_edit_keeps_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_reply("Gratitude noted.")))
        .expect(1)
        .mount(&server)
        .await;
    let (service, _temp_dir) = service(&server).await;

    let created = service
        .create(
            USER,
            NewReflection {
                mood: Mood::Happy,
                intensity: 6,
                content: "Family dinner after Maghrib".into(),
            },
        )
        .await
        .unwrap();

    let edited = service
        .update(
            USER,
            &created.id,
            ReflectionUpdate {
                mood: Some(Mood::Grateful),
                content: Some("Family dinner after Maghrib".into()),
                ..ReflectionUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.mood, Mood::Grateful);
    assert_eq!(edited.analysis_status, AnalysisStatus::Completed);
    assert!(edited.analysis.is_some());
}

#[tokio::test]
#[serial]
async fn test_list_and_mood_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_reply("Noted.")))
        .mount(&server)
        .await;
    let (service, _temp_dir) = service(&server).await;

    for (mood, intensity) in [(Mood::Grateful, 8), (Mood::Grateful, 6), (Mood::Sad, 4)] {
        service
            .create(
                USER,
                NewReflection {
                    mood,
                    intensity,
                    content: format!("Feeling {}", mood.as_str()),
                },
            )
            .await
            .unwrap();
    }

    let all = service.list(USER, None, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let sad = service.list(USER, None, Some(Mood::Sad)).await.unwrap();
    assert_eq!(sad.len(), 1);
    assert_eq!(sad[0].intensity, 4);

    let limited = service.list(USER, Some(2), None).await.unwrap();
    assert_eq!(limited.len(), 2);

    let summary = service.mood_summary(USER, 7, Utc::now()).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.dominant_mood, Some(Mood::Grateful));
    assert_eq!(summary.average_intensity, Some(6.0));
    assert_eq!(summary.moods.len(), 2);
    assert_eq!(summary.moods[0].count, 2);

    let other = service.mood_summary("someone-else", 7, Utc::now()).await.unwrap();
    assert_eq!(other.total, 0);
    assert!(other.average_intensity.is_none());
    assert!(other.dominant_mood.is_none());
}

#[tokio::test]
#[serial]
async fn test_reflection_validation() {
    let server = MockServer::start().await;
    let (service, _temp_dir) = service(&server).await;

    let blank = service
        .create(
            USER,
            NewReflection {
                mood: Mood::Peaceful,
                intensity: 5,
                content: "   ".into(),
            },
        )
        .await;
    assert!(matches!(blank, Err(ServiceError::MissingField { .. })));

    let too_intense = service
        .create(
            USER,
            NewReflection {
                mood: Mood::Peaceful,
                intensity: 11,
                content: "Calm".into(),
            },
        )
        .await;
    assert!(
        matches!(too_intense, Err(ServiceError::InvalidValue { field, .. }) if field == "intensity")
    );

    let bad_limit = service.list(USER, Some(0), None).await;
    assert!(matches!(bad_limit, Err(ServiceError::InvalidValue { field, .. }) if field == "limit"));

    let bad_window = service.mood_summary(USER, 0, Utc::now()).await;
    assert!(matches!(bad_window, Err(ServiceError::InvalidValue { field, .. }) if field == "days"));

    // Nothing was written and the model was never called
    assert!(service.list(USER, None, None).await.unwrap().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}
