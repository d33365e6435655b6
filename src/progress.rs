// ABOUTME: Progress source port supplying read-only recovery metrics at analysis time
// ABOUTME: ProgressSource async trait and a StaticProgressSource for CLI and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::errors::AppResult;
use crate::models::ProgressSnapshot;
use async_trait::async_trait;
use uuid::Uuid;

/// Supplies a `ProgressSnapshot` on demand
///
/// Queried once per cycle when analysis begins. Implementations own the
/// metrics; the engine never writes back.
#[async_trait]
pub trait ProgressSource: Send + Sync {
    /// Current metrics for a patient
    ///
    /// # Errors
    ///
    /// Returns `ProgressUnavailable` if metrics cannot be produced
    async fn snapshot(&self, patient_id: Uuid) -> AppResult<ProgressSnapshot>;
}

/// Returns the same snapshot for every patient
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProgressSource {
    snapshot: ProgressSnapshot,
}

impl StaticProgressSource {
    /// Serve `snapshot` for every request
    #[must_use]
    pub const fn new(snapshot: ProgressSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl ProgressSource for StaticProgressSource {
    async fn snapshot(&self, _patient_id: Uuid) -> AppResult<ProgressSnapshot> {
        Ok(self.snapshot)
    }
}
