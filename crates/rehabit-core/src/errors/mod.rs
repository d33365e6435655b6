// ABOUTME: Unified error handling with standard error codes for the adaptation engine
// ABOUTME: Defines AppError, ErrorCode, AppResult and the serializable ErrorResponse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Unified Error Handling System
//!
//! Centralized error type for the Rehabit engine. Components raise narrow
//! domain errors (`ValidationError`, `OrderingError`, `PersistenceError`,
//! `TransitionError`) which all convert into `AppError` so the outer
//! surfaces (CLI, presentation adapters) deal with a single shape.

/// Domain errors raised by intake, ledger, persistence, and the state machine
pub mod domain;

pub use domain::{FeedbackField, OrderingError, PersistenceError, ValidationError};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A feedback field failed validation
    ValidationFailed,
    /// Ledger append was out of sequence
    OrderingViolation,
    /// Write to the persistence port failed
    PersistenceFailed,
    /// A pipeline command was issued from a state that does not allow it
    InvalidTransition,
    /// Another adaptation cycle is already in flight
    CycleBusy,
    /// The progress source could not supply a snapshot
    ProgressUnavailable,
    /// Configuration is invalid
    ConfigInvalid,
    /// Data serialization/deserialization failed
    SerializationError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Stable string form of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::OrderingViolation => "ORDERING_VIOLATION",
            Self::PersistenceFailed => "PERSISTENCE_FAILED",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::CycleBusy => "CYCLE_BUSY",
            Self::ProgressUnavailable => "PROGRESS_UNAVAILABLE",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidationFailed => "The submitted feedback is invalid",
            Self::OrderingViolation => "Adaptation history must be appended in week order",
            Self::PersistenceFailed => "Saving the adapted plan failed",
            Self::InvalidTransition => "This action is not available at the current step",
            Self::CycleBusy => "An adaptation cycle is already in progress",
            Self::ProgressUnavailable => "Progress metrics are currently unavailable",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether the user can retry or correct the input within the same cycle
    ///
    /// Ordering violations are caller contract bugs and internal errors are
    /// not actionable; everything else is scoped to the current cycle.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::OrderingViolation | Self::InternalError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the engine
#[derive(Debug, ThisError)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Patient the failing cycle belongs to, if known
    pub patient_id: Option<Uuid>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            patient_id: None,
            source: None,
        }
    }

    /// Attach the patient the error belongs to
    #[must_use]
    pub fn with_patient_id(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Storage backend failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailed, message)
    }

    /// Serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Progress source failure
    pub fn progress_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProgressUnavailable, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Serializable error format for presentation adapters
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Whether the user may retry within the current cycle
    pub recoverable: bool,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            code: error.code,
            recoverable: error.code.is_recoverable(),
            message: error.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_recoverability() {
        assert!(ErrorCode::ValidationFailed.is_recoverable());
        assert!(ErrorCode::PersistenceFailed.is_recoverable());
        assert!(!ErrorCode::OrderingViolation.is_recoverable());
        assert!(!ErrorCode::InternalError.is_recoverable());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::storage("disk full");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("PERSISTENCE_FAILED"));
        assert!(json.contains("disk full"));
    }
}
