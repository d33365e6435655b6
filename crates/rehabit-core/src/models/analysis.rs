// ABOUTME: Analysis output models produced per adaptation cycle
// ABOUTME: RiskAssessment with alerts and trends, and prioritized Recommendation values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Risk classification of a feedback cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Pain within the comfortable range
    Low,
    /// Elevated pain
    Medium,
    /// Pain high enough to warrant advisories
    High,
}

impl RiskLevel {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Whether the level is medium or high
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a tracked metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Pain is clearly going down
    Improving,
    /// Pain is not clearly going down
    Stable,
    /// Metric is well above target
    Excellent,
    /// Metric is on track
    Good,
}

impl Trend {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Excellent => "excellent",
            Self::Good => "good",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric name keyed in `RiskAssessment::trends`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    /// Pain improvement
    Pain,
    /// Mobility change
    Mobility,
    /// Session adherence
    Adherence,
}

impl TrendMetric {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pain => "pain",
            Self::Mobility => "mobility",
            Self::Adherence => "adherence",
        }
    }
}

/// Risk classification with advisories and metric trends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Overall risk level
    pub risk_level: RiskLevel,
    /// Ordered advisory strings; empty unless risk is high
    pub alerts: Vec<String>,
    /// Trend per metric
    pub trends: BTreeMap<TrendMetric, Trend>,
}

impl RiskAssessment {
    /// Trend recorded for a metric
    #[must_use]
    pub fn trend(&self, metric: TrendMetric) -> Option<Trend> {
        self.trends.get(&metric).copied()
    }
}

/// Plan area a recommendation adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationCategory {
    /// Repetitions per exercise
    ExerciseIntensity,
    /// Meditation sessions
    MentalWellness,
    /// Protein intake
    Nutrition,
    /// Rest days
    RecoveryDays,
}

impl RecommendationCategory {
    /// Fixed generation order
    pub const ORDER: [Self; 4] = [
        Self::ExerciseIntensity,
        Self::MentalWellness,
        Self::Nutrition,
        Self::RecoveryDays,
    ];

    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExerciseIntensity => "exercise-intensity",
            Self::MentalWellness => "mental-wellness",
            Self::Nutrition => "nutrition",
            Self::RecoveryDays => "recovery-days",
        }
    }

    /// Human-readable title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ExerciseIntensity => "Exercise Intensity",
            Self::MentalWellness => "Mental Wellness",
            Self::Nutrition => "Nutrition",
            Self::RecoveryDays => "Recovery Days",
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    /// Optional
    Low,
    /// Worth doing
    Medium,
    /// Do this week
    High,
}

impl RecommendationPriority {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a recommendation's current and suggested values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationUnit {
    /// Repetitions
    Reps,
    /// Sessions per week
    SessionsPerWeek,
    /// Grams per day
    GramsPerDay,
    /// Days per week
    DaysPerWeek,
}

impl RecommendationUnit {
    /// Display suffix
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Reps => "reps",
            Self::SessionsPerWeek => "sessions/week",
            Self::GramsPerDay => "g/day",
            Self::DaysPerWeek => "days/week",
        }
    }
}

/// A single proposed adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Plan area
    pub category: RecommendationCategory,
    /// Value in force
    pub current: u32,
    /// Proposed value
    pub suggested: u32,
    /// Unit of both values
    pub unit: RecommendationUnit,
    /// Why the change is proposed
    pub reason: String,
    /// Urgency
    pub priority: RecommendationPriority,
}

impl Recommendation {
    /// Current value with unit, e.g. "10 reps"
    #[must_use]
    pub fn current_display(&self) -> String {
        format!("{} {}", self.current, self.unit.suffix())
    }

    /// Suggested value with unit, e.g. "8 reps"
    #[must_use]
    pub fn suggested_display(&self) -> String {
        format!("{} {}", self.suggested, self.unit.suffix())
    }

    /// Whether the suggestion differs from the current value
    #[must_use]
    pub const fn is_change(&self) -> bool {
        self.current != self.suggested
    }
}
