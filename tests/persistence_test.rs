// ABOUTME: Tests for the persistence port and its SQLite and in-memory backends
// ABOUTME: Default state, atomic two-key commits, reload across connections, and corrupt data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use rehabit::config::DatabaseUrl;
use rehabit::constants::storage_keys::{ADAPTATION_HISTORY, CURRENT_PLAN};
use rehabit::errors::ErrorCode;
use rehabit::ledger::AdaptationLedger;
use rehabit::models::{
    AdaptationHistoryEntry, AdaptationOutcome, BaselinePlan, PlanChange, PlanDomain,
};
use rehabit::persistence::{InMemoryStore, KeyValueStore, PlanRepository, SqliteStore};
use std::sync::Arc;
use tempfile::TempDir;

fn week_one() -> (BaselinePlan, AdaptationLedger) {
    let plan = BaselinePlan {
        week: 1,
        ..BaselinePlan::starter_program()
    };
    let ledger = AdaptationLedger::from_entries([AdaptationHistoryEntry {
        week: 1,
        date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        changes: vec![PlanChange::new(
            PlanDomain::Nutrition,
            "Protein: 120 -> 130 g/day",
            "Additional protein supports tissue repair",
        )],
        outcome: AdaptationOutcome::Neutral,
    }])
    .unwrap();
    (plan, ledger)
}

#[tokio::test]
async fn test_empty_store_loads_starter_program() {
    let repository = PlanRepository::new(Arc::new(InMemoryStore::new()));
    let state = repository.load().await.unwrap();
    assert_eq!(state.plan, BaselinePlan::starter_program());
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_memory_commit_writes_both_keys() {
    let store = InMemoryStore::new();
    let repository = PlanRepository::new(Arc::new(store.clone()));
    let (plan, ledger) = week_one();

    repository.commit(&plan, &ledger).await.unwrap();
    assert_eq!(store.len().await, 2);

    let state = repository.load().await.unwrap();
    assert_eq!(state.plan, plan);
    assert_eq!(state.history, ledger);
}

#[tokio::test]
async fn test_sqlite_state_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("rehabit.db"),
    };
    let (plan, ledger) = week_one();

    {
        let store = SqliteStore::connect(&url).await.unwrap();
        PlanRepository::new(Arc::new(store))
            .commit(&plan, &ledger)
            .await
            .unwrap();
    }

    let store = SqliteStore::connect(&url).await.unwrap();
    assert!(store.updated_at(CURRENT_PLAN).await.unwrap().is_some());
    let state = PlanRepository::new(Arc::new(store)).load().await.unwrap();
    assert_eq!(state.plan.week, 1);
    assert_eq!(state.history.len(), 1);
}

#[tokio::test]
async fn test_sqlite_put_all_overwrites_existing_keys() {
    let store = SqliteStore::connect(&DatabaseUrl::Memory).await.unwrap();
    store
        .put_all(&[("a", "1".to_owned()), ("b", "2".to_owned())])
        .await
        .unwrap();
    store.put_all(&[("a", "3".to_owned())]).await.unwrap();

    assert_eq!(store.get("a").await.unwrap().as_deref(), Some("3"));
    assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    assert!(store.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_plan_json_is_reported() {
    let store = InMemoryStore::with_entries([(CURRENT_PLAN, "{not json")]);
    let error = PlanRepository::new(Arc::new(store)).load().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::SerializationError);
}

#[tokio::test]
async fn test_out_of_order_stored_history_is_reported() {
    let (_, ledger) = week_one();
    let mut entries = ledger.entries().to_vec();
    entries.push(entries[0].clone());
    let store = InMemoryStore::with_entries([(
        ADAPTATION_HISTORY,
        serde_json::to_string(&entries).unwrap(),
    )]);

    let error = PlanRepository::new(Arc::new(store)).load().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::OrderingViolation);
}

#[tokio::test]
async fn test_plan_week_must_match_recorded_history() {
    let (plan, ledger) = week_one();
    let history_json = serde_json::to_string(ledger.entries()).unwrap();

    // history without its plan would fall back to week 0
    let store = InMemoryStore::with_entries([(ADAPTATION_HISTORY, history_json.clone())]);
    let error = PlanRepository::new(Arc::new(store)).load().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::OrderingViolation);
    assert!(error.message.contains("week 0"), "{}", error.message);

    let ahead = BaselinePlan { week: 3, ..plan };
    let store = InMemoryStore::with_entries([
        (CURRENT_PLAN, serde_json::to_string(&ahead).unwrap()),
        (ADAPTATION_HISTORY, history_json),
    ]);
    let error = PlanRepository::new(Arc::new(store)).load().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::OrderingViolation);

    // a plan stored ahead of any history is just as unusable
    let plan_json = serde_json::to_string(&ahead).unwrap();
    let store = InMemoryStore::with_entries([(CURRENT_PLAN, plan_json)]);
    assert!(PlanRepository::new(Arc::new(store)).load().await.is_err());
}
