// ABOUTME: Configuration module for the Rehabit application
// ABOUTME: Environment-driven settings for storage, patient identity, rules, and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

/// Environment variable parsing into `AppConfig`
pub mod environment;

pub use environment::{AppConfig, DatabaseUrl, StoreBackend, DEFAULT_DATABASE_URL};
