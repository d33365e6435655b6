// ABOUTME: Adaptation pipeline: cycle state machine and the async controller driving it
// ABOUTME: Re-exports the controller, its builder, task handles, and the pipeline error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Adaptation Pipeline
//!
//! One cycle per patient:
//!
//! ```text
//! idle -> feedbackCollected -> analyzing -> analysisReady
//!      -> planGenerating -> planReady -> confirmed
//! ```
//!
//! Any in-progress phase may be cancelled, and from `analyzing` onward the
//! cycle may go back to `feedbackCollected`. Both ended phases reset to
//! `idle` through `start_new_cycle`.

/// Async controller and background task handles
pub mod controller;
/// Phases, commands, cycle state, and errors
pub mod state;

pub use controller::{CycleTask, CycleView, PipelineBuilder, PipelineController, TaskOutcome};
pub use state::{
    validate_transition, CycleAnalysis, CycleState, PipelineCommand, PipelineError,
    PipelinePhase, TransitionError,
};
