// ABOUTME: Core data models for the Rehabit adaptive recovery plan engine
// ABOUTME: Re-exports feedback, progress, plan, analysis, delta, and history types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Data Models
//!
//! This module contains the data structures that flow through one
//! adaptation cycle:
//!
//! - `FeedbackRecord`: one patient's validated weekly self-report
//! - `ProgressSnapshot`: read-only metrics supplied by the surrounding application
//! - `RiskAssessment` and `Recommendation`: ephemeral analysis output
//! - `BaselinePlan`: the regimen in force before adaptation
//! - `AdjustedPlanDelta`: the before/after diff produced for a cycle
//! - `AdaptationHistoryEntry`: the permanent record of a confirmed cycle
//!
//! All models serialize with camelCase field names so the persisted JSON
//! matches the keys used by the presentation layer.

mod analysis;
mod delta;
mod feedback;
mod history;
mod plan;
mod progress;

// Feedback domain
pub use feedback::{
    Difficulty, FatigueLevel, FeedbackRecord, GuidedPreference, MoodScore, PainLevel,
};

// Progress domain
pub use progress::ProgressSnapshot;

// Plan domain
pub use plan::{BaselinePlan, Exercise, NutritionTargets, WellnessTargets};

// Analysis domain
pub use analysis::{
    Recommendation, RecommendationCategory, RecommendationPriority, RecommendationUnit,
    RiskAssessment, RiskLevel, Trend, TrendMetric,
};

// Delta domain
pub use delta::{
    AdjustedExercise, AdjustedPlanDelta, DeltaInvariantViolation, ExerciseDelta, ItemStatus,
    ValueDelta,
};

// History domain
pub use history::{AdaptationHistoryEntry, AdaptationOutcome, PlanChange, PlanDomain};
