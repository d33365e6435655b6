// ABOUTME: Weekly patient feedback models with range-checked ratings
// ABOUTME: FeedbackRecord, PainLevel, MoodScore, Difficulty, FatigueLevel, GuidedPreference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::constants::ranges::{MOOD_MAX, MOOD_MIN, PAIN_MAX, PAIN_MIN};
use crate::errors::{FeedbackField, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pain rating on a 0-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PainLevel(u8);

impl PainLevel {
    /// Validate a raw rating
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming `painLevel` when outside 0-10
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (PAIN_MIN..=PAIN_MAX).contains(v))
            .map(Self)
            .ok_or_else(|| {
                ValidationError::out_of_range(
                    FeedbackField::PainLevel,
                    value,
                    i64::from(PAIN_MIN),
                    i64::from(PAIN_MAX),
                )
            })
    }

    /// The rating value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for PainLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PainLevel> for u8 {
    fn from(level: PainLevel) -> Self {
        level.0
    }
}

/// Mood rating on a 1-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    /// Validate a raw rating
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming `mood` when outside 1-10
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MOOD_MIN..=MOOD_MAX).contains(v))
            .map(Self)
            .ok_or_else(|| {
                ValidationError::out_of_range(
                    FeedbackField::Mood,
                    value,
                    i64::from(MOOD_MIN),
                    i64::from(MOOD_MAX),
                )
            })
    }

    /// The rating value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> Self {
        score.0
    }
}

/// How the exercises felt this week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    /// Exercises felt too easy
    TooEasy,
    /// Exercises felt about right
    JustRight,
    /// Exercises felt too hard
    TooHard,
}

impl Difficulty {
    /// Accepted wire values
    pub const VARIANTS: &'static [&'static str] = &["too-easy", "just-right", "too-hard"];

    /// Parse a wire value
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming `difficulty` for unknown values
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "too-easy" => Ok(Self::TooEasy),
            "just-right" => Ok(Self::JustRight),
            "too-hard" => Ok(Self::TooHard),
            other => Err(ValidationError::unknown_variant(
                FeedbackField::Difficulty,
                other,
                Self::VARIANTS,
            )),
        }
    }

    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooEasy => "too-easy",
            Self::JustRight => "just-right",
            Self::TooHard => "too-hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported fatigue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueLevel {
    /// Little or no fatigue
    Low,
    /// Noticeable fatigue
    Moderate,
    /// Persistent fatigue
    High,
}

impl FatigueLevel {
    /// Accepted wire values
    pub const VARIANTS: &'static [&'static str] = &["low", "moderate", "high"];

    /// Parse a wire value
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming `fatigue` for unknown values
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(ValidationError::unknown_variant(
                FeedbackField::Fatigue,
                other,
                Self::VARIANTS,
            )),
        }
    }

    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl fmt::Display for FatigueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the patient prefers guided sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidedPreference {
    /// Prefers guided sessions
    Yes,
    /// Prefers self-directed sessions
    No,
}

impl GuidedPreference {
    /// Accepted wire values
    pub const VARIANTS: &'static [&'static str] = &["yes", "no"];

    /// Parse a wire value
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming `preferGuided` for unknown values
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(ValidationError::unknown_variant(
                FeedbackField::PreferGuided,
                other,
                Self::VARIANTS,
            )),
        }
    }

    /// Whether guided sessions are preferred
    #[must_use]
    pub const fn is_guided(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// One patient's validated weekly self-report
///
/// Produced only by feedback intake; the pipeline hands out clones, never
/// mutable access, so a record is effectively immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Pain rating (0-10)
    pub pain_level: PainLevel,
    /// Mood rating (1-10)
    pub mood: MoodScore,
    /// Perceived exercise difficulty
    pub difficulty: Difficulty,
    /// Fatigue level
    pub fatigue: FatigueLevel,
    /// Whether joint stiffness was reported
    pub stiffness: bool,
    /// Free-text description of the pain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_note: Option<String>,
    /// Guided session preference
    pub prefer_guided: GuidedPreference,
    /// Comments addressed to the doctor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_comments: Option<String>,
    /// When intake accepted the feedback
    pub submitted_at: DateTime<Utc>,
    /// Who submitted the feedback
    pub submitted_by: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pain_level_bounds() {
        assert!(PainLevel::new(0).is_ok());
        assert!(PainLevel::new(10).is_ok());
        assert!(PainLevel::new(-1).is_err());
        assert!(PainLevel::new(11).is_err());
    }

    #[test]
    fn test_mood_rejects_zero() {
        let error = MoodScore::new(0).unwrap_err();
        assert_eq!(error.field, FeedbackField::Mood);
    }

    #[test]
    fn test_difficulty_wire_format() {
        assert_eq!(Difficulty::parse("too-hard").unwrap(), Difficulty::TooHard);
        assert_eq!(
            serde_json::to_string(&Difficulty::JustRight).unwrap(),
            "\"just-right\""
        );
        assert!(Difficulty::parse("TOO-HARD").is_err());
    }
}
