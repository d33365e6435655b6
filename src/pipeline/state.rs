// ABOUTME: Adaptation cycle states, transition table, and pipeline error taxonomy
// ABOUTME: CycleState carries each phase's data so invalid combinations cannot be built
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::errors::{AppError, ErrorCode, OrderingError, PersistenceError, ValidationError};
use crate::models::{
    AdaptationHistoryEntry, AdjustedPlanDelta, FeedbackRecord, Recommendation, RiskAssessment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Phase of an adaptation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelinePhase {
    /// Waiting for feedback
    Idle,
    /// Feedback validated and held
    FeedbackCollected,
    /// Risk and recommendations being computed
    Analyzing,
    /// Risk and recommendations available
    AnalysisReady,
    /// Plan delta being computed
    PlanGenerating,
    /// Plan delta awaiting confirmation
    PlanReady,
    /// Plan applied and recorded (terminal)
    Confirmed,
    /// Cycle abandoned (terminal)
    Cancelled,
}

impl PipelinePhase {
    /// Phases a cycle may move to from `self`
    ///
    /// `Analyzing -> FeedbackCollected` and `PlanGenerating -> AnalysisReady`
    /// double as the rollback taken when a task fails.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::FeedbackCollected, Self::Cancelled],
            Self::FeedbackCollected => &[Self::Analyzing, Self::Cancelled],
            Self::Analyzing => &[Self::AnalysisReady, Self::FeedbackCollected, Self::Cancelled],
            Self::AnalysisReady => &[
                Self::PlanGenerating,
                Self::FeedbackCollected,
                Self::Cancelled,
            ],
            Self::PlanGenerating => &[
                Self::PlanReady,
                Self::AnalysisReady,
                Self::FeedbackCollected,
                Self::Cancelled,
            ],
            Self::PlanReady => &[Self::Confirmed, Self::FeedbackCollected, Self::Cancelled],
            Self::Confirmed | Self::Cancelled => &[Self::Idle],
        }
    }

    /// Whether `next` is reachable in one step
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether the cycle has ended
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether a cycle is underway (neither idle nor ended)
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        !matches!(self, Self::Idle | Self::Confirmed | Self::Cancelled)
    }

    /// Stable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FeedbackCollected => "feedbackCollected",
            Self::Analyzing => "analyzing",
            Self::AnalysisReady => "analysisReady",
            Self::PlanGenerating => "planGenerating",
            Self::PlanReady => "planReady",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineCommand {
    /// Validate feedback and start a cycle
    SubmitFeedback,
    /// Start risk and recommendation analysis
    BeginAnalysis,
    /// Analysis task finished
    CompleteAnalysis,
    /// Start plan delta generation
    BeginPlanGeneration,
    /// Plan generation task finished
    CompletePlanGeneration,
    /// Apply and record the plan
    ConfirmPlan,
    /// Roll back after an in-flight task failed
    FailTask,
    /// Drop analysis and plan, keep feedback
    GoBack,
    /// Abandon the cycle
    Cancel,
    /// Reset an ended cycle to idle
    StartNewCycle,
}

impl PipelineCommand {
    /// Stable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubmitFeedback => "submitFeedback",
            Self::BeginAnalysis => "beginAnalysis",
            Self::CompleteAnalysis => "completeAnalysis",
            Self::BeginPlanGeneration => "beginPlanGeneration",
            Self::CompletePlanGeneration => "completePlanGeneration",
            Self::ConfirmPlan => "confirmPlan",
            Self::FailTask => "failTask",
            Self::GoBack => "goBack",
            Self::Cancel => "cancel",
            Self::StartNewCycle => "startNewCycle",
        }
    }
}

impl fmt::Display for PipelineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command was issued from a phase that does not allow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{command} is not allowed while {from}")]
pub struct TransitionError {
    /// Phase the cycle was in
    pub from: PipelinePhase,
    /// Command that was rejected
    pub command: PipelineCommand,
}

/// Check a single step against the transition table
///
/// # Errors
///
/// Returns `TransitionError` if `to` is not reachable from `from`
pub fn validate_transition(
    from: PipelinePhase,
    to: PipelinePhase,
    command: PipelineCommand,
) -> Result<(), TransitionError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(TransitionError { from, command })
    }
}

/// Risk assessment and recommendations for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleAnalysis {
    /// Risk classification
    pub assessment: RiskAssessment,
    /// Recommendations in category order
    pub recommendations: Vec<Recommendation>,
}

/// Cycle state with the data each phase owns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CycleState {
    /// Waiting for feedback
    #[default]
    Idle,
    /// Feedback validated
    FeedbackCollected {
        /// Validated feedback
        feedback: FeedbackRecord,
    },
    /// Analysis task in flight
    Analyzing {
        /// Validated feedback
        feedback: FeedbackRecord,
    },
    /// Analysis available
    AnalysisReady {
        /// Validated feedback
        feedback: FeedbackRecord,
        /// Analysis output
        analysis: CycleAnalysis,
    },
    /// Plan generation task in flight
    PlanGenerating {
        /// Validated feedback
        feedback: FeedbackRecord,
        /// Analysis output
        analysis: CycleAnalysis,
    },
    /// Plan delta awaiting confirmation
    PlanReady {
        /// Validated feedback
        feedback: FeedbackRecord,
        /// Analysis output
        analysis: CycleAnalysis,
        /// Proposed plan change
        delta: AdjustedPlanDelta,
    },
    /// Plan applied and recorded
    Confirmed {
        /// Entry appended to the ledger
        entry: AdaptationHistoryEntry,
    },
    /// Cycle abandoned
    Cancelled,
}

impl CycleState {
    /// Phase of this state
    #[must_use]
    pub const fn phase(&self) -> PipelinePhase {
        match self {
            Self::Idle => PipelinePhase::Idle,
            Self::FeedbackCollected { .. } => PipelinePhase::FeedbackCollected,
            Self::Analyzing { .. } => PipelinePhase::Analyzing,
            Self::AnalysisReady { .. } => PipelinePhase::AnalysisReady,
            Self::PlanGenerating { .. } => PipelinePhase::PlanGenerating,
            Self::PlanReady { .. } => PipelinePhase::PlanReady,
            Self::Confirmed { .. } => PipelinePhase::Confirmed,
            Self::Cancelled => PipelinePhase::Cancelled,
        }
    }

    /// Feedback held by the cycle, if any
    #[must_use]
    pub const fn feedback(&self) -> Option<&FeedbackRecord> {
        match self {
            Self::FeedbackCollected { feedback }
            | Self::Analyzing { feedback }
            | Self::AnalysisReady { feedback, .. }
            | Self::PlanGenerating { feedback, .. }
            | Self::PlanReady { feedback, .. } => Some(feedback),
            Self::Idle | Self::Confirmed { .. } | Self::Cancelled => None,
        }
    }

    /// Analysis held by the cycle, if any
    #[must_use]
    pub const fn analysis(&self) -> Option<&CycleAnalysis> {
        match self {
            Self::AnalysisReady { analysis, .. }
            | Self::PlanGenerating { analysis, .. }
            | Self::PlanReady { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    /// Plan delta held by the cycle, if any
    #[must_use]
    pub const fn delta(&self) -> Option<&AdjustedPlanDelta> {
        match self {
            Self::PlanReady { delta, .. } => Some(delta),
            _ => None,
        }
    }
}

/// Errors returned by controller commands
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Submitted feedback failed validation; the cycle stays idle
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Ledger append out of sequence
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    /// Confirmation write failed; the cycle stays at plan-ready
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Command not allowed in the current phase
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Another cycle is already underway
    #[error("an adaptation cycle is already in progress ({phase})")]
    Busy {
        /// Phase of the running cycle
        phase: PipelinePhase,
    },

    /// The progress source failed
    #[error("progress metrics unavailable: {0}")]
    Progress(#[source] AppError),

    /// Rule evaluation failed unexpectedly
    #[error("internal engine failure: {0}")]
    Internal(#[source] AppError),
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Validation(e) => e.into(),
            PipelineError::Ordering(e) => e.into(),
            PipelineError::Persistence(e) => e.into(),
            PipelineError::Transition(e) => Self::new(ErrorCode::InvalidTransition, e.to_string()),
            PipelineError::Busy { phase } => Self::new(
                ErrorCode::CycleBusy,
                format!("an adaptation cycle is already in progress ({phase})"),
            ),
            PipelineError::Progress(e) | PipelineError::Internal(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases_only_reset_to_idle() {
        assert_eq!(
            PipelinePhase::Confirmed.allowed_transitions(),
            &[PipelinePhase::Idle]
        );
        assert!(!PipelinePhase::Cancelled.can_transition_to(PipelinePhase::FeedbackCollected));
    }

    #[test]
    fn test_every_in_progress_phase_can_cancel() {
        for phase in [
            PipelinePhase::Idle,
            PipelinePhase::FeedbackCollected,
            PipelinePhase::Analyzing,
            PipelinePhase::AnalysisReady,
            PipelinePhase::PlanGenerating,
            PipelinePhase::PlanReady,
        ] {
            assert!(phase.can_transition_to(PipelinePhase::Cancelled), "{phase}");
        }
    }

    #[test]
    fn test_skipping_analysis_is_rejected() {
        let error = validate_transition(
            PipelinePhase::FeedbackCollected,
            PipelinePhase::PlanGenerating,
            PipelineCommand::BeginPlanGeneration,
        )
        .unwrap_err();
        assert_eq!(error.from, PipelinePhase::FeedbackCollected);
        assert_eq!(
            error.to_string(),
            "beginPlanGeneration is not allowed while feedbackCollected"
        );
    }
}
