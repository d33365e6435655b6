// ABOUTME: Domain error types for feedback validation, ledger ordering, and persistence
// ABOUTME: Each converts into AppError so callers can surface a single error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use super::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Feedback field named by a `ValidationError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackField {
    /// Pain rating (0-10)
    PainLevel,
    /// Mood rating (1-10)
    Mood,
    /// Perceived exercise difficulty
    Difficulty,
    /// Fatigue level
    Fatigue,
    /// Guided session preference
    PreferGuided,
}

impl FeedbackField {
    /// Field name as it appears in submitted feedback
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PainLevel => "painLevel",
            Self::Mood => "mood",
            Self::Difficulty => "difficulty",
            Self::Fatigue => "fatigue",
            Self::PreferGuided => "preferGuided",
        }
    }
}

impl fmt::Display for FeedbackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feedback field violated its declared range or enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// The offending field
    pub field: FeedbackField,
    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for a field
    pub fn new(field: FeedbackField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Value outside an integer range
    #[must_use]
    pub fn out_of_range(field: FeedbackField, value: i64, min: i64, max: i64) -> Self {
        Self::new(
            field,
            format!("{value} is outside the allowed range {min}-{max}"),
        )
    }

    /// Value not among the enumerated variants
    #[must_use]
    pub fn unknown_variant(field: FeedbackField, value: &str, allowed: &[&str]) -> Self {
        Self::new(
            field,
            format!("'{value}' is not one of: {}", allowed.join(", ")),
        )
    }
}

/// Ledger append that would leave a gap or reorder history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("adaptation history out of order: expected week {expected}, got week {actual}")]
pub struct OrderingError {
    /// The only week the ledger would accept next
    pub expected: u32,
    /// The week that was offered
    pub actual: u32,
}

/// Write to the persistence port failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to persist '{key}': {reason}")]
pub struct PersistenceError {
    /// Logical key (or keys) being written
    pub key: String,
    /// Backend failure description
    pub reason: String,
}

impl PersistenceError {
    /// Create a persistence error for a logical key
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::new(ErrorCode::ValidationFailed, error.to_string())
    }
}

impl From<OrderingError> for AppError {
    fn from(error: OrderingError) -> Self {
        Self::new(ErrorCode::OrderingViolation, error.to_string())
    }
}

impl From<PersistenceError> for AppError {
    fn from(error: PersistenceError) -> Self {
        Self::new(ErrorCode::PersistenceFailed, error.to_string())
    }
}
