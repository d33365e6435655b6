// ABOUTME: Helper modules for rehabit-cli
// ABOUTME: Report formatting for analysis, plan deltas, and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

pub mod display;
