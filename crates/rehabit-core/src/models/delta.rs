// ABOUTME: Before/after plan diff produced by the plan adjuster for one cycle
// ABOUTME: Name-keyed exercise matching with explicit new/changed/unchanged status per item
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use super::analysis::{Recommendation, RecommendationCategory};
use super::history::{PlanChange, PlanDomain};
use super::plan::{BaselinePlan, Exercise, NutritionTargets, WellnessTargets};
use crate::errors::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Status of an `after` exercise relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// No baseline exercise has this name
    New,
    /// Baseline exercise with different reps or sets
    Changed,
    /// Baseline exercise carried over as is
    Unchanged,
}

impl ItemStatus {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// An exercise in the adjusted plan with its status flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedExercise {
    /// The adjusted exercise
    #[serde(flatten)]
    pub exercise: Exercise,
    /// Relation to the baseline
    pub status: ItemStatus,
}

impl AdjustedExercise {
    /// Whether the item is flagged `new`
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.status, ItemStatus::New)
    }

    /// Whether the item is flagged `changed`
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self.status, ItemStatus::Changed)
    }
}

/// Exercise list before and after adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDelta {
    /// Baseline exercises in baseline order
    pub before: Vec<Exercise>,
    /// Adjusted exercises with status flags
    pub after: Vec<AdjustedExercise>,
}

impl ExerciseDelta {
    /// Look up an adjusted exercise by name
    #[must_use]
    pub fn after_named(&self, name: &str) -> Option<&AdjustedExercise> {
        self.after.iter().find(|item| item.exercise.name == name)
    }

    /// Total reps of the baseline exercises
    #[must_use]
    pub fn total_reps_before(&self) -> u32 {
        self.before
            .iter()
            .map(Exercise::total_reps)
            .fold(0, u32::saturating_add)
    }

    /// Total reps of the adjusted exercises
    #[must_use]
    pub fn total_reps_after(&self) -> u32 {
        self.after
            .iter()
            .map(|item| item.exercise.total_reps())
            .fold(0, u32::saturating_add)
    }
}

/// Field-by-field before/after pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDelta<T> {
    /// Value in the baseline
    pub before: T,
    /// Value in the adjusted plan
    pub after: T,
}

impl<T: PartialEq> ValueDelta<T> {
    /// Create a pair
    pub const fn new(before: T, after: T) -> Self {
        Self { before, after }
    }

    /// Whether the value changed
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }
}

/// Violation of the before/after identity invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaInvariantViolation {
    /// A matched or unchanged item has no baseline counterpart
    #[error("exercise '{name}' is flagged {status} but has no baseline match")]
    UnmatchedExercise {
        /// Exercise name
        name: String,
        /// Flag it carries
        status: &'static str,
    },
    /// An item flagged `new` shares a name with a baseline exercise
    #[error("exercise '{name}' is flagged new but exists in the baseline")]
    MisflaggedNew {
        /// Exercise name
        name: String,
    },
    /// Flag disagrees with the reps/sets comparison
    #[error("exercise '{name}' is flagged {status} but reps/sets say otherwise")]
    StatusMismatch {
        /// Exercise name
        name: String,
        /// Flag it carries
        status: &'static str,
    },
    /// A baseline exercise is missing from the adjusted list
    #[error("baseline exercise '{name}' was dropped from the adjusted plan")]
    DroppedExercise {
        /// Exercise name
        name: String,
    },
    /// Two adjusted exercises share a name
    #[error("exercise '{name}' appears more than once in the adjusted plan")]
    DuplicateExercise {
        /// Exercise name
        name: String,
    },
}

impl From<DeltaInvariantViolation> for AppError {
    fn from(violation: DeltaInvariantViolation) -> Self {
        Self::internal(violation.to_string())
    }
}

/// The before/after diff produced for one adaptation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedPlanDelta {
    /// Baseline week + 1
    pub week_number: u32,
    /// Cycle date + 1 day
    pub start_date: NaiveDate,
    /// Exercise diff
    pub exercises: ExerciseDelta,
    /// Nutrition diff
    pub nutrition: ValueDelta<NutritionTargets>,
    /// Wellness diff
    pub wellness: ValueDelta<WellnessTargets>,
    /// Rest days per week diff
    pub rest_days: ValueDelta<u32>,
}

impl AdjustedPlanDelta {
    /// The plan that replaces the baseline on confirmation
    #[must_use]
    pub fn adjusted_plan(&self) -> BaselinePlan {
        BaselinePlan {
            week: self.week_number,
            exercises: self
                .exercises
                .after
                .iter()
                .map(|item| item.exercise.clone())
                .collect(),
            nutrition: self.nutrition.after,
            wellness: self.wellness.after,
            rest_days_per_week: self.rest_days.after,
        }
    }

    /// Check that every `after` item either matches a baseline item by name
    /// or is flagged `new`, and that no baseline item is dropped.
    ///
    /// # Errors
    ///
    /// Returns the first `DeltaInvariantViolation` found, in `after` order
    /// and then `before` order.
    pub fn verify_exercise_identity(&self) -> Result<(), DeltaInvariantViolation> {
        let before: HashMap<&str, &Exercise> = self
            .exercises
            .before
            .iter()
            .map(|exercise| (exercise.name.as_str(), exercise))
            .collect();
        let mut seen = HashSet::with_capacity(self.exercises.after.len());

        for item in &self.exercises.after {
            let name = item.exercise.name.as_str();
            if !seen.insert(name) {
                return Err(DeltaInvariantViolation::DuplicateExercise {
                    name: name.to_owned(),
                });
            }

            match (item.status, before.get(name)) {
                (ItemStatus::New, None) => {}
                (ItemStatus::New, Some(_)) => {
                    return Err(DeltaInvariantViolation::MisflaggedNew {
                        name: name.to_owned(),
                    });
                }
                (status, None) => {
                    return Err(DeltaInvariantViolation::UnmatchedExercise {
                        name: name.to_owned(),
                        status: status.as_str(),
                    });
                }
                (status, Some(original)) => {
                    let differs =
                        original.reps != item.exercise.reps || original.sets != item.exercise.sets;
                    if differs != matches!(status, ItemStatus::Changed) {
                        return Err(DeltaInvariantViolation::StatusMismatch {
                            name: name.to_owned(),
                            status: status.as_str(),
                        });
                    }
                }
            }
        }

        if let Some(dropped) = self
            .exercises
            .before
            .iter()
            .find(|exercise| !seen.contains(exercise.name.as_str()))
        {
            return Err(DeltaInvariantViolation::DroppedExercise {
                name: dropped.name.clone(),
            });
        }

        Ok(())
    }

    /// Ordered change list for the history entry: exercise items in `after`
    /// order, then nutrition, wellness, and rest days.
    #[must_use]
    pub fn changes(&self, recommendations: &[Recommendation]) -> Vec<PlanChange> {
        let reason_for = |category: RecommendationCategory| {
            recommendations
                .iter()
                .find(|rec| rec.category == category)
                .map(|rec| rec.reason.clone())
                .unwrap_or_default()
        };
        let mut changes = Vec::new();

        for item in &self.exercises.after {
            let exercise = &item.exercise;
            match item.status {
                ItemStatus::New => changes.push(PlanChange::new(
                    PlanDomain::Exercise,
                    format!(
                        "Added {}: {} reps x {} sets",
                        exercise.name, exercise.reps, exercise.sets
                    ),
                    "New exercise introduced this week",
                )),
                ItemStatus::Changed => {
                    let before = self
                        .exercises
                        .before
                        .iter()
                        .find(|original| original.name == exercise.name);
                    let detail = before.map_or_else(
                        || format!("{}: {} reps", exercise.name, exercise.reps),
                        |original| {
                            format!(
                                "{}: {}x{} -> {}x{} reps",
                                exercise.name,
                                original.sets,
                                original.reps,
                                exercise.sets,
                                exercise.reps
                            )
                        },
                    );
                    changes.push(PlanChange::new(
                        PlanDomain::Exercise,
                        detail,
                        reason_for(RecommendationCategory::ExerciseIntensity),
                    ));
                }
                ItemStatus::Unchanged => {}
            }
        }

        let (nutrition_before, nutrition_after) = (self.nutrition.before, self.nutrition.after);
        for (label, before, after, unit) in [
            (
                "Protein",
                nutrition_before.protein_grams,
                nutrition_after.protein_grams,
                "g/day",
            ),
            (
                "Calories",
                nutrition_before.calories,
                nutrition_after.calories,
                "kcal/day",
            ),
            (
                "Water",
                nutrition_before.water_glasses,
                nutrition_after.water_glasses,
                "glasses/day",
            ),
        ] {
            if before != after {
                changes.push(PlanChange::new(
                    PlanDomain::Nutrition,
                    format!("{label}: {before} -> {after} {unit}"),
                    reason_for(RecommendationCategory::Nutrition),
                ));
            }
        }

        let (wellness_before, wellness_after) = (self.wellness.before, self.wellness.after);
        for (label, before, after, unit) in [
            (
                "Meditation",
                wellness_before.meditation_sessions_per_week,
                wellness_after.meditation_sessions_per_week,
                "sessions/week",
            ),
            (
                "Journaling",
                wellness_before.journaling_per_week,
                wellness_after.journaling_per_week,
                "entries/week",
            ),
            (
                "Breathing",
                wellness_before.breathing_minutes_per_day,
                wellness_after.breathing_minutes_per_day,
                "min/day",
            ),
        ] {
            if before != after {
                changes.push(PlanChange::new(
                    PlanDomain::Wellness,
                    format!("{label}: {before} -> {after} {unit}"),
                    reason_for(RecommendationCategory::MentalWellness),
                ));
            }
        }

        if self.rest_days.is_changed() {
            changes.push(PlanChange::new(
                PlanDomain::RestDays,
                format!(
                    "Rest days: {} -> {} days/week",
                    self.rest_days.before, self.rest_days.after
                ),
                reason_for(RecommendationCategory::RecoveryDays),
            ));
        }

        changes
    }
}
