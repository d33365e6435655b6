// ABOUTME: Recommendation generator producing one prioritized adjustment per plan area
// ABOUTME: Exercise intensity, mental wellness, nutrition, and recovery days in fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Recommendation Generator
//!
//! Pure function of `(FeedbackRecord, BaselinePlan)`. Always emits exactly
//! four recommendations in `RecommendationCategory::ORDER`; the list is
//! never sorted by priority.

use crate::config::{EngineConfig, RecommendationRules};
use rehabit_core::models::{
    BaselinePlan, Difficulty, FatigueLevel, FeedbackRecord, Recommendation,
    RecommendationCategory, RecommendationPriority, RecommendationUnit,
};

/// Scale a rep count by `multiplier`, rounding half away from zero
#[must_use]
pub fn scale_reps(reps: u32, multiplier: f64, min_reps: u32) -> u32 {
    let scaled = (f64::from(reps) * multiplier).round();
    if scaled <= 0.0 {
        return min_reps;
    }
    (scaled as u32).max(min_reps)
}

/// Generates the per-cycle recommendation list
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    rules: RecommendationRules,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    /// Create a generator from the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::global())
    }

    /// Create a generator from explicit configuration
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            rules: config.recommendations.clone(),
        }
    }

    /// Produce the four recommendations for a cycle
    #[must_use]
    pub fn generate(
        &self,
        feedback: &FeedbackRecord,
        baseline: &BaselinePlan,
    ) -> Vec<Recommendation> {
        vec![
            self.exercise_intensity(feedback, baseline),
            self.mental_wellness(feedback, baseline),
            self.nutrition(baseline),
            self.recovery_days(feedback, baseline),
        ]
    }

    fn exercise_intensity(
        &self,
        feedback: &FeedbackRecord,
        baseline: &BaselinePlan,
    ) -> Recommendation {
        let current = baseline.lead_reps().unwrap_or(self.rules.fallback_reps);
        let too_hard = feedback.difficulty == Difficulty::TooHard;
        let multiplier = self.rules.intensity_multiplier(feedback.difficulty);
        let suggested = (f64::from(current) * multiplier).round().max(0.0) as u32;
        let percent = ((multiplier - 1.0).abs() * 100.0).round();

        let reason = if too_hard {
            format!(
                "Reduce reps by {percent}% because exercises were reported too hard with {} fatigue",
                feedback.fatigue
            )
        } else {
            format!(
                "Increase reps by {percent}% for progressive overload since exercises felt {} with {} fatigue",
                feedback.difficulty, feedback.fatigue
            )
        };

        Recommendation {
            category: RecommendationCategory::ExerciseIntensity,
            current,
            suggested,
            unit: RecommendationUnit::Reps,
            reason,
            priority: RecommendationPriority::High,
        }
    }

    fn mental_wellness(
        &self,
        feedback: &FeedbackRecord,
        baseline: &BaselinePlan,
    ) -> Recommendation {
        let mood = feedback.mood.get();
        let low_mood = mood <= self.rules.low_mood_at_or_below;

        let (suggested, priority, reason) = if low_mood {
            (
                self.rules.low_mood_sessions,
                RecommendationPriority::High,
                format!(
                    "Mood of {mood}/10 is low; additional guided meditation supports mood stabilization during recovery"
                ),
            )
        } else {
            (
                self.rules.baseline_sessions,
                RecommendationPriority::Medium,
                format!("Mood of {mood}/10 is steady; regular meditation maintains emotional balance"),
            )
        };

        Recommendation {
            category: RecommendationCategory::MentalWellness,
            current: baseline.wellness.meditation_sessions_per_week,
            suggested,
            unit: RecommendationUnit::SessionsPerWeek,
            reason,
            priority,
        }
    }

    fn nutrition(&self, baseline: &BaselinePlan) -> Recommendation {
        let current = baseline.nutrition.protein_grams;
        Recommendation {
            category: RecommendationCategory::Nutrition,
            current,
            suggested: current.saturating_add(self.rules.protein_increment_grams),
            unit: RecommendationUnit::GramsPerDay,
            reason: "Additional protein supports muscle and tissue repair during rehabilitation"
                .to_owned(),
            priority: RecommendationPriority::Medium,
        }
    }

    fn recovery_days(
        &self,
        feedback: &FeedbackRecord,
        baseline: &BaselinePlan,
    ) -> Recommendation {
        let current = baseline.rest_days_per_week;
        let (suggested, priority, reason) = if feedback.fatigue == FatigueLevel::High {
            (
                current.saturating_add(self.rules.rest_day_increment),
                RecommendationPriority::High,
                "High fatigue reported; an extra rest day prevents overtraining and allows recovery"
                    .to_owned(),
            )
        } else {
            (
                current,
                RecommendationPriority::Low,
                format!(
                    "Fatigue is {}; the current rest schedule supports adequate recovery",
                    feedback.fatigue
                ),
            )
        };

        Recommendation {
            category: RecommendationCategory::RecoveryDays,
            current,
            suggested,
            unit: RecommendationUnit::DaysPerWeek,
            reason,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_reps_rounds_and_clamps() {
        assert_eq!(scale_reps(10, 0.8, 1), 8);
        assert_eq!(scale_reps(10, 1.2, 1), 12);
        assert_eq!(scale_reps(12, 0.8, 1), 10);
        assert_eq!(scale_reps(1, 0.4, 1), 1);
        assert_eq!(scale_reps(0, 1.2, 1), 1);
    }
}
