// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Feedback builders, fixed clock, controllable stores, and gated progress sources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `rehabit`
//!
//! Each integration test binary pulls this in with `mod common;`, so not
//! every helper is used everywhere.

use async_trait::async_trait;
use chrono::NaiveDate;
use rehabit::clock::FixedClock;
use rehabit::errors::{AppError, AppResult};
use rehabit::intelligence::{EngineConfig, RawFeedback};
use rehabit::models::ProgressSnapshot;
use rehabit::persistence::{InMemoryStore, KeyValueStore, PlanRepository};
use rehabit::pipeline::{PipelineBuilder, PipelineController, TaskOutcome};
use rehabit::progress::{ProgressSource, StaticProgressSource};
use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tokio::sync::Semaphore;
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Date every test cycle runs on
pub fn cycle_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

/// Clock pinned at midnight of `cycle_date()`
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(cycle_date()))
}

/// Rule configuration with built-in defaults, independent of the environment
pub fn default_engine() -> EngineConfig {
    EngineConfig::default()
}

/// Fully populated raw feedback
pub fn raw_feedback(pain: i64, mood: i64, difficulty: &str, fatigue: &str) -> RawFeedback {
    RawFeedback {
        pain_level: Some(pain),
        mood: Some(mood),
        difficulty: Some(difficulty.to_owned()),
        fatigue: Some(fatigue.to_owned()),
        stiffness: false,
        pain_note: None,
        prefer_guided: Some("yes".to_owned()),
        doctor_comments: None,
    }
}

/// Severe week: high pain, low mood, too hard, high fatigue, stiff joints
pub fn high_risk_feedback() -> RawFeedback {
    RawFeedback {
        stiffness: true,
        pain_note: Some("Sharp pain when bending the knee".to_owned()),
        ..raw_feedback(8, 4, "too-hard", "high")
    }
}

/// Good week: low pain, good mood, right difficulty, low fatigue
pub fn low_risk_feedback() -> RawFeedback {
    raw_feedback(2, 8, "just-right", "low")
}

/// Controller over `store` with a fixed clock and default rules
pub async fn controller_with(
    store: Arc<dyn KeyValueStore>,
    progress: Arc<dyn ProgressSource>,
) -> PipelineController {
    init_test_logging();
    PipelineBuilder::new(Uuid::nil(), PlanRepository::new(store))
        .with_clock(test_clock())
        .with_engine_config(default_engine())
        .with_progress_source(progress)
        .build()
        .await
        .unwrap()
}

/// Controller over a fresh in-memory store with zero progress metrics
pub async fn memory_controller() -> (PipelineController, InMemoryStore) {
    let store = InMemoryStore::new();
    let controller = controller_with(
        Arc::new(store.clone()),
        Arc::new(StaticProgressSource::default()),
    )
    .await;
    (controller, store)
}

/// Submit, analyze, and generate a plan, asserting each task applied
pub async fn run_to_plan_ready(controller: &PipelineController, raw: &RawFeedback) {
    controller.submit_feedback(raw).await.unwrap();
    let outcome = controller.begin_analysis().await.unwrap().wait().await;
    assert!(outcome.is_applied(), "analysis: {outcome:?}");
    let outcome = controller.begin_plan_generation().await.unwrap().wait().await;
    assert!(outcome.is_applied(), "plan generation: {outcome:?}");
}

/// Whether an outcome is a failure
pub fn is_failed(outcome: &TaskOutcome) -> bool {
    matches!(outcome, TaskOutcome::Failed(_))
}

/// In-memory store whose writes can be made to fail on demand
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub async fn stored_keys(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> AppResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage("disk full"));
        }
        self.inner.put_all(entries).await
    }
}

/// Progress source that blocks each request until a permit is released
pub struct GatedProgressSource {
    gate: Semaphore,
    snapshot: ProgressSnapshot,
    requests: AtomicUsize,
}

impl GatedProgressSource {
    pub fn new(snapshot: ProgressSnapshot) -> Self {
        Self {
            gate: Semaphore::new(0),
            snapshot,
            requests: AtomicUsize::new(0),
        }
    }

    /// Let `n` pending or future requests complete
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressSource for GatedProgressSource {
    async fn snapshot(&self, _patient_id: Uuid) -> AppResult<ProgressSnapshot> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map_err(|e| AppError::internal(e.to_string()))?
            .forget();
        Ok(self.snapshot)
    }
}

/// Progress source that always fails
pub struct UnavailableProgressSource;

#[async_trait]
impl ProgressSource for UnavailableProgressSource {
    async fn snapshot(&self, _patient_id: Uuid) -> AppResult<ProgressSnapshot> {
        Err(AppError::progress_unavailable("metrics service offline"))
    }
}
