// ABOUTME: Command modules for rehabit-cli
// ABOUTME: Cycle execution plus read-only plan and history views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

pub mod cycle;
pub mod history;
