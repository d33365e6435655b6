// ABOUTME: Baseline rehabilitation plan models for exercise, nutrition, wellness, and rest
// ABOUTME: Includes the starter program used before any adaptation has been confirmed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::constants::starter_program;
use serde::{Deserialize, Serialize};

/// One prescribed exercise
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name, unique within a plan
    pub name: String,
    /// Repetitions per set
    pub reps: u32,
    /// Number of sets
    pub sets: u32,
    /// Display label for the expected duration (e.g. "10 min")
    pub duration_label: String,
}

impl Exercise {
    /// Create an exercise
    pub fn new(
        name: impl Into<String>,
        reps: u32,
        sets: u32,
        duration_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reps,
            sets,
            duration_label: duration_label.into(),
        }
    }

    /// Total repetitions across all sets
    #[must_use]
    pub const fn total_reps(&self) -> u32 {
        self.reps.saturating_mul(self.sets)
    }
}

/// Daily nutrition targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    /// Protein (grams per day)
    pub protein_grams: u32,
    /// Energy (kcal per day)
    pub calories: u32,
    /// Water (glasses per day)
    pub water_glasses: u32,
}

/// Mental wellness targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessTargets {
    /// Guided meditation sessions per week
    pub meditation_sessions_per_week: u32,
    /// Journaling entries per week
    pub journaling_per_week: u32,
    /// Breathing practice minutes per day
    pub breathing_minutes_per_day: u32,
}

/// The regimen in force before an adaptation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselinePlan {
    /// Program week this plan belongs to (0 for the starter program)
    #[serde(default)]
    pub week: u32,
    /// Ordered exercises; names are unique
    pub exercises: Vec<Exercise>,
    /// Nutrition targets
    pub nutrition: NutritionTargets,
    /// Wellness targets
    pub wellness: WellnessTargets,
    /// Rest days per week
    pub rest_days_per_week: u32,
}

impl BaselinePlan {
    /// The starter program used when no plan has been stored yet
    #[must_use]
    pub fn starter_program() -> Self {
        Self {
            week: starter_program::WEEK,
            exercises: starter_program::EXERCISES
                .iter()
                .map(|&(name, reps, sets, duration)| Exercise::new(name, reps, sets, duration))
                .collect(),
            nutrition: NutritionTargets {
                protein_grams: starter_program::PROTEIN_GRAMS,
                calories: starter_program::CALORIES,
                water_glasses: starter_program::WATER_GLASSES,
            },
            wellness: WellnessTargets {
                meditation_sessions_per_week: starter_program::MEDITATION_SESSIONS,
                journaling_per_week: starter_program::JOURNALING_SESSIONS,
                breathing_minutes_per_day: starter_program::BREATHING_MINUTES,
            },
            rest_days_per_week: starter_program::REST_DAYS,
        }
    }

    /// Look up an exercise by exact (case-sensitive) name
    #[must_use]
    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.name == name)
    }

    /// Reps of the first exercise, the value shown as current intensity
    #[must_use]
    pub fn lead_reps(&self) -> Option<u32> {
        self.exercises.first().map(|exercise| exercise.reps)
    }

    /// Total weekly repetitions per session across all exercises
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.exercises
            .iter()
            .map(Exercise::total_reps)
            .fold(0, u32::saturating_add)
    }
}

impl Default for BaselinePlan {
    fn default() -> Self {
        Self::starter_program()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_program_shape() {
        let plan = BaselinePlan::starter_program();
        assert_eq!(plan.week, 0);
        assert_eq!(plan.exercises.len(), 3);
        assert_eq!(plan.lead_reps(), Some(10));
        assert_eq!(plan.rest_days_per_week, 1);
        // 10*3 + 15*3 + 12*2
        assert_eq!(plan.total_reps(), 99);
    }

    #[test]
    fn test_exercise_lookup_is_case_sensitive() {
        let plan = BaselinePlan::starter_program();
        assert!(plan.exercise("Quad Sets").is_some());
        assert!(plan.exercise("quad sets").is_none());
    }

    #[test]
    fn test_plan_json_uses_camel_case() {
        let json = serde_json::to_value(BaselinePlan::starter_program()).unwrap();
        assert_eq!(json["restDaysPerWeek"], 1);
        assert_eq!(json["exercises"][0]["durationLabel"], "10 min");
        assert_eq!(json["wellness"]["meditationSessionsPerWeek"], 3);
    }
}
