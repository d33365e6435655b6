// ABOUTME: Plan adjuster combining the baseline plan with recommendations into a before/after delta
// ABOUTME: Name-keyed exercise matching with new/changed/unchanged flags and an identity check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Plan Adjuster
//!
//! The adjuster is deterministic: identical `(BaselinePlan, Recommendation[],
//! FeedbackRecord, cycle_date)` always produce an identical
//! `AdjustedPlanDelta`. The only date it reads is the one passed in.

use crate::config::{AdjustmentRules, EngineConfig, RecommendationRules};
use crate::recommendation_engine::scale_reps;
use chrono::{Days, NaiveDate};
use rehabit_core::errors::{AppError, AppResult};
use rehabit_core::models::{
    AdjustedExercise, AdjustedPlanDelta, BaselinePlan, Exercise, ExerciseDelta, FeedbackRecord,
    ItemStatus, Recommendation, RecommendationCategory, ValueDelta,
};
use std::collections::HashMap;

/// Builds the adjusted plan delta for a cycle
#[derive(Debug, Clone)]
pub struct PlanAdjuster {
    rules: AdjustmentRules,
    intensity: RecommendationRules,
}

impl Default for PlanAdjuster {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanAdjuster {
    /// Create an adjuster from the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::global())
    }

    /// Create an adjuster from explicit configuration
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            rules: config.adjustment.clone(),
            intensity: config.recommendations.clone(),
        }
    }

    /// Compute the before/after delta
    ///
    /// # Errors
    ///
    /// Returns an internal error if `cycle_date` is the last representable
    /// date, or if the produced delta breaks the exercise identity invariant
    pub fn adjust(
        &self,
        baseline: &BaselinePlan,
        recommendations: &[Recommendation],
        feedback: &FeedbackRecord,
        cycle_date: NaiveDate,
    ) -> AppResult<AdjustedPlanDelta> {
        let start_date = cycle_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::internal(format!("no calendar day after {cycle_date}")))?;

        let suggested = |category: RecommendationCategory, current: u32| {
            find(recommendations, category).map_or(current, |rec| rec.suggested)
        };

        let mut nutrition = baseline.nutrition;
        nutrition.protein_grams = suggested(
            RecommendationCategory::Nutrition,
            baseline.nutrition.protein_grams,
        );

        let mut wellness = baseline.wellness;
        wellness.meditation_sessions_per_week = suggested(
            RecommendationCategory::MentalWellness,
            baseline.wellness.meditation_sessions_per_week,
        );

        let delta = AdjustedPlanDelta {
            week_number: baseline.week.saturating_add(1),
            start_date,
            exercises: ExerciseDelta {
                before: baseline.exercises.clone(),
                after: self.adjust_exercises(baseline, recommendations, feedback),
            },
            nutrition: ValueDelta::new(baseline.nutrition, nutrition),
            wellness: ValueDelta::new(baseline.wellness, wellness),
            rest_days: ValueDelta::new(
                baseline.rest_days_per_week,
                suggested(
                    RecommendationCategory::RecoveryDays,
                    baseline.rest_days_per_week,
                ),
            ),
        };

        delta.verify_exercise_identity()?;
        Ok(delta)
    }

    /// Scale every baseline exercise, append mobility work for stiffness,
    /// then flag each item against the baseline by name.
    ///
    /// Each exercise is scaled from its own reps by the configured multiplier
    /// for the reported difficulty, never by the lead exercise's rounded ratio.
    fn adjust_exercises(
        &self,
        baseline: &BaselinePlan,
        recommendations: &[Recommendation],
        feedback: &FeedbackRecord,
    ) -> Vec<AdjustedExercise> {
        let multiplier = find(recommendations, RecommendationCategory::ExerciseIntensity)
            .map(|_| self.intensity.intensity_multiplier(feedback.difficulty));

        let mut candidates: Vec<Exercise> = baseline
            .exercises
            .iter()
            .map(|exercise| {
                let mut adjusted = exercise.clone();
                if let Some(multiplier) = multiplier {
                    adjusted.reps = scale_reps(exercise.reps, multiplier, self.rules.min_reps);
                }
                adjusted
            })
            .collect();

        let mobility = &self.rules.mobility_exercise;
        if feedback.stiffness
            && self.rules.insert_mobility_on_stiffness
            && baseline.exercise(&mobility.name).is_none()
        {
            candidates.push(mobility.to_exercise());
        }

        let before: HashMap<&str, &Exercise> = baseline
            .exercises
            .iter()
            .map(|exercise| (exercise.name.as_str(), exercise))
            .collect();

        candidates
            .into_iter()
            .map(|exercise| {
                let status = match before.get(exercise.name.as_str()) {
                    None => ItemStatus::New,
                    Some(original)
                        if original.reps != exercise.reps || original.sets != exercise.sets =>
                    {
                        ItemStatus::Changed
                    }
                    Some(_) => ItemStatus::Unchanged,
                };
                AdjustedExercise { exercise, status }
            })
            .collect()
    }
}

fn find(
    recommendations: &[Recommendation],
    category: RecommendationCategory,
) -> Option<&Recommendation> {
    recommendations.iter().find(|rec| rec.category == category)
}
