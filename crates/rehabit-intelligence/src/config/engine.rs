// ABOUTME: Rule configuration sections for risk, recommendations, and plan adjustment
// ABOUTME: Defaults reproduce the fixed thresholds and multipliers of the adaptation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Engine rule sections
//!
//! Each section has a `Default` built from `rehabit_core::constants::rules`
//! so the engine behaves identically whether or not configuration is
//! loaded from the environment.

use rehabit_core::constants::rules;
use rehabit_core::models::{Difficulty, Exercise};
use serde::{Deserialize, Serialize};

/// Thresholds used by the risk classifier (all strict `>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Pain above this is high risk
    pub high_pain_above: u8,
    /// Pain above this (and not high) is medium risk
    pub medium_pain_above: u8,
    /// Pain improvement (%) above this trends `improving`
    pub pain_improvement_above_pct: f64,
    /// Mobility change (%) above this trends `excellent`
    pub mobility_change_above_pct: f64,
    /// Consistency (%) above this trends `excellent`
    pub consistency_above_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_pain_above: rules::HIGH_PAIN_ABOVE,
            medium_pain_above: rules::MEDIUM_PAIN_ABOVE,
            pain_improvement_above_pct: rules::PAIN_IMPROVEMENT_ABOVE_PCT,
            mobility_change_above_pct: rules::MOBILITY_CHANGE_ABOVE_PCT,
            consistency_above_pct: rules::CONSISTENCY_ABOVE_PCT,
        }
    }
}

/// Constants used by the recommendation generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// Rep multiplier when exercises are too hard
    pub reduction_multiplier: f64,
    /// Rep multiplier otherwise
    pub progression_multiplier: f64,
    /// Mood at or below this gets extra sessions
    pub low_mood_at_or_below: u8,
    /// Meditation sessions for low mood
    pub low_mood_sessions: u32,
    /// Meditation sessions otherwise
    pub baseline_sessions: u32,
    /// Fixed protein increment (g/day)
    pub protein_increment_grams: u32,
    /// Extra rest days for high fatigue
    pub rest_day_increment: u32,
    /// Reps assumed when the plan has no exercises
    pub fallback_reps: u32,
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            reduction_multiplier: rules::REDUCTION_MULTIPLIER,
            progression_multiplier: rules::PROGRESSION_MULTIPLIER,
            low_mood_at_or_below: rules::LOW_MOOD_AT_OR_BELOW,
            low_mood_sessions: rules::LOW_MOOD_SESSIONS,
            baseline_sessions: rules::BASELINE_SESSIONS,
            protein_increment_grams: rules::PROTEIN_INCREMENT_GRAMS,
            rest_day_increment: rules::REST_DAY_INCREMENT,
            fallback_reps: rules::FALLBACK_REPS,
        }
    }
}

impl RecommendationRules {
    /// Rep multiplier for the reported difficulty
    ///
    /// Too-hard sessions take the reduction; anything else progresses.
    #[must_use]
    pub fn intensity_multiplier(&self, difficulty: Difficulty) -> f64 {
        if difficulty == Difficulty::TooHard {
            self.reduction_multiplier
        } else {
            self.progression_multiplier
        }
    }
}

/// Exercise appended when stiffness is reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilityExercise {
    /// Exercise name
    pub name: String,
    /// Repetitions per set
    pub reps: u32,
    /// Number of sets
    pub sets: u32,
    /// Duration label
    pub duration_label: String,
}

impl MobilityExercise {
    /// As a plan exercise
    #[must_use]
    pub fn to_exercise(&self) -> Exercise {
        Exercise::new(
            self.name.clone(),
            self.reps,
            self.sets,
            self.duration_label.clone(),
        )
    }
}

impl Default for MobilityExercise {
    fn default() -> Self {
        Self {
            name: "Ankle Pumps".into(),
            reps: 20,
            sets: 2,
            duration_label: "5 min".into(),
        }
    }
}

/// Constants used by the plan adjuster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRules {
    /// Append `mobility_exercise` when stiffness is reported
    pub insert_mobility_on_stiffness: bool,
    /// Exercise appended for stiffness
    pub mobility_exercise: MobilityExercise,
    /// Scaled reps never drop below this
    pub min_reps: u32,
}

impl Default for AdjustmentRules {
    fn default() -> Self {
        Self {
            insert_mobility_on_stiffness: true,
            mobility_exercise: MobilityExercise::default(),
            min_reps: rules::MIN_REPS,
        }
    }
}
