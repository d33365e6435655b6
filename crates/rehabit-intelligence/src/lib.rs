// ABOUTME: Rule evaluation engine for adaptive recovery plans
// ABOUTME: Intake, risk classification, recommendations, plan adjustment, and outcome policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

#![deny(unsafe_code)]

//! # Rehabit Intelligence
//!
//! Deterministic, synchronous rule evaluation for one adaptation cycle.
//! Nothing in this crate performs I/O or reads the wall clock; the pipeline
//! in the root crate supplies timestamps and progress metrics.
//!
//! Data flows one way:
//!
//! ```text
//! RawFeedback -> FeedbackIntake -> FeedbackRecord
//!     FeedbackRecord x ProgressSnapshot -> RiskClassifier -> RiskAssessment
//!     FeedbackRecord x BaselinePlan -> RecommendationEngine -> Vec<Recommendation>
//! BaselinePlan x Recommendations x FeedbackRecord -> PlanAdjuster -> AdjustedPlanDelta
//! ```

/// Engine rule configuration with environment overrides
pub mod config;

/// Raw feedback validation
pub mod intake;

/// Outcome classification policies
pub mod outcome;

/// Before/after plan delta construction
pub mod plan_adjuster;

/// Per-category recommendation generation
pub mod recommendation_engine;

/// Risk level, advisories, and trends
pub mod risk_classifier;

pub use config::{ConfigError, EngineConfig};
pub use intake::{FeedbackIntake, RawFeedback};
pub use outcome::{OutcomeClassifier, RiskResponsivePolicy};
pub use plan_adjuster::PlanAdjuster;
pub use recommendation_engine::RecommendationEngine;
pub use risk_classifier::RiskClassifier;
