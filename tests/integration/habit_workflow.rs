//! Habit tracking workflow tests.
//!
//! Tests the habit lifecycle:
//! 1. Create habit
//! 2. Check in over several days
//! 3. Compute streaks
//! 4. Undo a check-in
//! 5. Archive and delete

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use barakah::error::ServiceError;
use barakah::services::{HabitService, HabitUpdate, NewHabit};
use barakah::storage::{HabitCategory, SqliteStorage};
use chrono::NaiveDate;
use serial_test::serial;
use tempfile::TempDir;

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

async fn service() -> (HabitService<SqliteStorage>, TempDir) {
    let (storage, temp_dir) = create_test_storage().await;
    (HabitService::new(Arc::new(storage)), temp_dir)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[tokio::test]
#[serial]
async fn test_check_ins_and_streaks() {
    let (service, _temp_dir) = service().await;
    let today = day(14);

    let habit = service
        .create(
            USER,
            NewHabit {
                name: "Read one page of Quran".into(),
                category: HabitCategory::Quran,
                target_per_day: 1,
            },
        )
        .await
        .unwrap();

    // Done on 10, 12, 13 and 14
    for d in [10, 12, 13, 14] {
        service.check_in(USER, &habit.id, day(d), 1, today).await.unwrap();
    }

    let stats = service.stats(USER, &habit.id, today).await.unwrap();
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.total_check_ins, 4);
    assert!(stats.completed_today);

    // Undoing today keeps yesterday's streak alive
    service.undo_check_in(USER, &habit.id, today).await.unwrap();
    let stats = service.stats(USER, &habit.id, today).await.unwrap();
    assert!(!stats.completed_today);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.total_check_ins, 3);

    // Undoing again reports the missing check-in
    let again = service.undo_check_in(USER, &habit.id, today).await;
    assert!(matches!(again, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn test_daily_target() {
    let (service, _temp_dir) = service().await;
    let today = day(11);

    let habit = service
        .create(
            USER,
            NewHabit {
                name: "Istighfar x100".into(),
                category: HabitCategory::Dhikr,
                target_per_day: 3,
            },
        )
        .await
        .unwrap();

    service.check_in(USER, &habit.id, today, 2, today).await.unwrap();
    let stats = service.stats(USER, &habit.id, today).await.unwrap();
    assert!(!stats.completed_today);
    assert_eq!(stats.current_streak, 0);

    // A second check-in on the same day replaces the count
    let log = service.check_in(USER, &habit.id, today, 3, today).await.unwrap();
    assert_eq!(log.count, 3);
    let stats = service.stats(USER, &habit.id, today).await.unwrap();
    assert!(stats.completed_today);
    assert_eq!(stats.total_check_ins, 3);
    assert_eq!(stats.completion_rate, 1.0 / 30.0);
}

#[tokio::test]
#[serial]
async fn test_check_in_validation() {
    let (service, _temp_dir) = service().await;
    let today = day(11);

    let habit = service
        .create(
            USER,
            NewHabit {
                name: "Sadaqah".into(),
                category: HabitCategory::Charity,
                target_per_day: 1,
            },
        )
        .await
        .unwrap();

    let future = service.check_in(USER, &habit.id, day(12), 1, today).await;
    assert!(matches!(future, Err(ServiceError::InvalidValue { field, .. }) if field == "date"));

    let zero = service.check_in(USER, &habit.id, today, 0, today).await;
    assert!(matches!(zero, Err(ServiceError::InvalidValue { field, .. }) if field == "count"));

    let unknown = service.check_in(USER, "missing", today, 1, today).await;
    assert!(matches!(unknown, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn test_archive_and_delete() {
    let (service, _temp_dir) = service().await;

    let habit = service
        .create(
            USER,
            NewHabit {
                name: "Monday fast".into(),
                category: HabitCategory::Fasting,
                target_per_day: 1,
            },
        )
        .await
        .unwrap();
    service.check_in(USER, &habit.id, day(11), 1, day(11)).await.unwrap();

    let archived = service
        .update(
            USER,
            &habit.id,
            HabitUpdate {
                archived: Some(true),
                name: Some("Monday and Thursday fasts".into()),
                ..HabitUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(archived.archived);
    assert_eq!(archived.name, "Monday and Thursday fasts");

    assert!(service.list(USER, false).await.unwrap().is_empty());
    assert_eq!(service.list(USER, true).await.unwrap().len(), 1);

    let bad_target = service
        .update(
            USER,
            &habit.id,
            HabitUpdate {
                target_per_day: Some(0),
                ..HabitUpdate::default()
            },
        )
        .await;
    assert!(matches!(bad_target, Err(ServiceError::InvalidValue { .. })));

    service.delete(USER, &habit.id).await.unwrap();
    assert!(matches!(
        service.stats(USER, &habit.id, day(11)).await,
        Err(ServiceError::NotFound { .. })
    ));
}
