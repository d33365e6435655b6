// ABOUTME: Feedback intake that validates raw weekly input into an immutable FeedbackRecord
// ABOUTME: Checks rating ranges and enumerated fields, normalizes notes, stamps submitter and time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use chrono::{DateTime, Utc};
use rehabit_core::errors::{FeedbackField, ValidationError};
use rehabit_core::models::{
    Difficulty, FatigueLevel, FeedbackRecord, GuidedPreference, MoodScore, PainLevel,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unvalidated feedback as submitted by the presentation layer
///
/// Every field is optional at this level so a missing value is reported
/// as a `ValidationError` naming the field rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeedback {
    /// Pain rating, expected 0-10
    pub pain_level: Option<i64>,
    /// Mood rating, expected 1-10
    pub mood: Option<i64>,
    /// `too-easy` | `just-right` | `too-hard`
    pub difficulty: Option<String>,
    /// `low` | `moderate` | `high`
    pub fatigue: Option<String>,
    /// Joint stiffness reported
    #[serde(default)]
    pub stiffness: bool,
    /// Free-text pain description
    pub pain_note: Option<String>,
    /// `yes` | `no`
    pub prefer_guided: Option<String>,
    /// Comments for the doctor
    pub doctor_comments: Option<String>,
}

/// Validates `RawFeedback` into `FeedbackRecord`
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackIntake;

impl FeedbackIntake {
    /// Validate and stamp raw feedback
    ///
    /// Fields are checked in declaration order and the first violation is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first missing or invalid field
    pub fn accept(
        raw: &RawFeedback,
        submitted_by: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> Result<FeedbackRecord, ValidationError> {
        let pain_level = PainLevel::new(required(raw.pain_level, FeedbackField::PainLevel)?)?;
        let mood = MoodScore::new(required(raw.mood, FeedbackField::Mood)?)?;
        let difficulty = Difficulty::parse(required(
            raw.difficulty.as_deref(),
            FeedbackField::Difficulty,
        )?)?;
        let fatigue =
            FatigueLevel::parse(required(raw.fatigue.as_deref(), FeedbackField::Fatigue)?)?;
        let prefer_guided = GuidedPreference::parse(required(
            raw.prefer_guided.as_deref(),
            FeedbackField::PreferGuided,
        )?)?;

        Ok(FeedbackRecord {
            pain_level,
            mood,
            difficulty,
            fatigue,
            stiffness: raw.stiffness,
            pain_note: normalize_note(raw.pain_note.as_deref()),
            prefer_guided,
            doctor_comments: normalize_note(raw.doctor_comments.as_deref()),
            submitted_at,
            submitted_by,
        })
    }
}

fn required<T>(value: Option<T>, field: FeedbackField) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "is required"))
}

/// Trim free text; blank text becomes `None`
fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
