// ABOUTME: Progress metrics consumed by the risk classifier
// ABOUTME: ProgressSnapshot is owned by the surrounding application and never mutated here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use serde::{Deserialize, Serialize};

/// Percent-based recovery metrics at the time a cycle is analysed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Reduction in reported pain since program start (%)
    pub pain_improvement_pct: f64,
    /// Range-of-motion change since program start (%)
    pub mobility_change_pct: f64,
    /// Share of scheduled sessions completed (%)
    pub consistency_rate_pct: f64,
}

impl ProgressSnapshot {
    /// Build a snapshot from the three percentages
    #[must_use]
    pub const fn new(
        pain_improvement_pct: f64,
        mobility_change_pct: f64,
        consistency_rate_pct: f64,
    ) -> Self {
        Self {
            pain_improvement_pct,
            mobility_change_pct,
            consistency_rate_pct,
        }
    }
}
