// ABOUTME: Outcome classification policies for confirmed adaptations
// ABOUTME: Pluggable OutcomeClassifier trait with a risk-responsive default policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use rehabit_core::models::{AdaptationOutcome, AdjustedPlanDelta, RiskAssessment, RiskLevel};

/// Assigns an outcome to a confirmed adaptation
///
/// The ledger only stores and aggregates outcomes; the rule lives here so
/// callers can swap it without touching history storage.
pub trait OutcomeClassifier: Send + Sync {
    /// Classify the adaptation described by `delta` for the assessed risk
    fn classify(&self, assessment: &RiskAssessment, delta: &AdjustedPlanDelta)
        -> AdaptationOutcome;
}

/// Default policy: an adaptation is positive when it backs off under
/// elevated risk or grows wellness support, negative when it adds load
/// under high risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskResponsivePolicy;

impl OutcomeClassifier for RiskResponsivePolicy {
    fn classify(
        &self,
        assessment: &RiskAssessment,
        delta: &AdjustedPlanDelta,
    ) -> AdaptationOutcome {
        let reps_before = delta.exercises.total_reps_before();
        let reps_after = delta.exercises.total_reps_after();
        let backs_off = reps_after < reps_before || delta.rest_days.after > delta.rest_days.before;
        let more_wellness = delta.wellness.after.meditation_sessions_per_week
            > delta.wellness.before.meditation_sessions_per_week;

        if (assessment.risk_level.is_elevated() && backs_off) || more_wellness {
            AdaptationOutcome::Positive
        } else if assessment.risk_level == RiskLevel::High && reps_after > reps_before {
            AdaptationOutcome::Negative
        } else {
            AdaptationOutcome::Neutral
        }
    }
}
