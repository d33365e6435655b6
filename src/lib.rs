// ABOUTME: Main library entry point for the Rehabit adaptive recovery plan engine
// ABOUTME: Wires rule evaluation, the cycle pipeline, persistence, and logging together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

#![deny(unsafe_code)]

//! # Rehabit
//!
//! Turns a patient's weekly self-reported feedback into a classified risk
//! level, per-category recommendations, and a concrete before/after change
//! to their rehabilitation plan. Each confirmed change is appended to an
//! ordered adaptation history.
//!
//! ## Architecture
//!
//! - **`rehabit-core`**: feedback, plan, delta, and history types plus errors
//! - **`rehabit-intelligence`**: synchronous, deterministic rules
//! - **pipeline**: async cycle controller with cancellable tasks
//! - **persistence**: atomic key-value port with `SQLite` and in-memory stores
//! - **ledger**: append-only history with aggregates
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rehabit::errors::AppResult;
//! use rehabit::intelligence::RawFeedback;
//! use rehabit::persistence::{InMemoryStore, PlanRepository};
//! use rehabit::pipeline::PipelineBuilder;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let repository = PlanRepository::new(Arc::new(InMemoryStore::new()));
//!     let controller = PipelineBuilder::new(Uuid::new_v4(), repository).build().await?;
//!
//!     let raw: RawFeedback = serde_json::from_str(
//!         r#"{"painLevel":8,"mood":4,"difficulty":"too-hard","fatigue":"high","preferGuided":"yes"}"#,
//!     )?;
//!     controller.submit_feedback(&raw).await?;
//!     controller.begin_analysis().await?.wait().await;
//!     controller.begin_plan_generation().await?.wait().await;
//!     let entry = controller.confirm_plan().await?;
//!     println!("week {} recorded with {} changes", entry.week, entry.changes.len());
//!     Ok(())
//! }
//! ```

pub use rehabit_core::{constants, errors, models};
pub use rehabit_intelligence as intelligence;

/// Injectable time source
pub mod clock;

/// Environment-driven application configuration
pub mod config;

/// Append-only adaptation history
pub mod ledger;

/// Structured logging setup and domain log helpers
pub mod logging;

/// Key-value persistence port and backends
pub mod persistence;

/// Adaptation cycle state machine and controller
pub mod pipeline;

/// Progress metrics port
pub mod progress;
