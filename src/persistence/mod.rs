// ABOUTME: Persistence port for the current plan and adaptation history
// ABOUTME: KeyValueStore trait with atomic multi-key writes, backend factory, and typed PlanRepository
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Persistence Port
//!
//! The engine reaches durable storage only through [`KeyValueStore`]. Two
//! logical keys are used:
//!
//! - `currentPlan`: JSON `BaselinePlan`
//! - `adaptationHistory`: JSON array of `AdaptationHistoryEntry`
//!
//! Both are read once when a controller is built and written together,
//! in one atomic `put_all`, when a plan is confirmed.

/// In-memory store
pub mod memory;
/// `SQLite` store
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{AppConfig, StoreBackend};
use crate::constants::storage_keys::{ADAPTATION_HISTORY, CURRENT_PLAN};
use crate::errors::{AppError, AppResult, ErrorCode, PersistenceError};
use crate::ledger::AdaptationLedger;
use crate::models::{AdaptationHistoryEntry, BaselinePlan};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Key-value store backing the persistence port
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write several keys atomically: either every pair is stored or none is
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is applied in that case
    async fn put_all(&self, entries: &[(&str, String)]) -> AppResult<()>;
}

/// Open the store selected by configuration
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened or migrated
pub async fn open_store(config: &AppConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    match config.store {
        StoreBackend::Memory => {
            info!("Using in-memory store; adaptations will not survive a restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            info!(database = %config.database_url, "Opening SQLite store");
            Ok(Arc::new(SqliteStore::connect(&config.database_url).await?))
        }
    }
}

/// Plan and history as loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    /// Plan in force (the starter program when nothing was stored)
    pub plan: BaselinePlan,
    /// Confirmed adaptations
    pub history: AdaptationLedger,
}

/// Typed access to the two logical keys
#[derive(Clone)]
pub struct PlanRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PlanRepository {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the current plan and history
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, stored JSON is
    /// malformed, stored history is out of week order, or the stored plan's
    /// week is not the latest recorded week
    pub async fn load(&self) -> AppResult<PersistedState> {
        let plan = match self.store.get(CURRENT_PLAN).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => {
                debug!("No stored plan; starting from the starter program");
                BaselinePlan::starter_program()
            }
        };

        let history = match self.store.get(ADAPTATION_HISTORY).await? {
            Some(json) => {
                let entries: Vec<AdaptationHistoryEntry> = serde_json::from_str(&json)?;
                AdaptationLedger::from_entries(entries).map_err(AppError::from)?
            }
            None => AdaptationLedger::new(),
        };

        // the next confirmation appends plan.week + 1, so the two keys must agree
        let recorded_week = history.latest_week().unwrap_or(0);
        if plan.week != recorded_week {
            return Err(AppError::new(
                ErrorCode::OrderingViolation,
                format!(
                    "stored plan week {} does not match history week {recorded_week}",
                    plan.week
                ),
            ));
        }

        Ok(PersistedState { plan, history })
    }

    /// Write plan and history in a single atomic store call
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if serialization or the write fails;
    /// neither key is changed in that case
    pub async fn commit(
        &self,
        plan: &BaselinePlan,
        history: &AdaptationLedger,
    ) -> Result<(), PersistenceError> {
        let keys = format!("{CURRENT_PLAN}+{ADAPTATION_HISTORY}");
        let plan_json = serde_json::to_string(plan)
            .map_err(|e| PersistenceError::new(CURRENT_PLAN, e.to_string()))?;
        let history_json = serde_json::to_string(history.entries())
            .map_err(|e| PersistenceError::new(ADAPTATION_HISTORY, e.to_string()))?;

        self.store
            .put_all(&[(CURRENT_PLAN, plan_json), (ADAPTATION_HISTORY, history_json)])
            .await
            .map_err(|e| PersistenceError::new(keys, e.message))
    }
}
