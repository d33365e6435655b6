// ABOUTME: Core types and constants for the Rehabit adaptive recovery platform
// ABOUTME: Foundation crate with error handling, plan and feedback models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

#![deny(unsafe_code)]

//! # Rehabit Core
//!
//! Foundation crate providing shared types and constants for the Rehabit
//! adaptive recovery plan engine. This crate is designed to change
//! infrequently so the rule engine and the pipeline crates can build on a
//! stable vocabulary.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   domain errors raised by intake, the ledger, and persistence
//! - **models**: Feedback, progress, plan, analysis, delta, and history types
//! - **constants**: Persistence keys, advisory messages, and default plan values

/// Unified error handling system with standard error codes
pub mod errors;

/// Rehabilitation domain models (feedback, plans, deltas, history)
pub mod models;

/// Application constants organized by domain
pub mod constants;
