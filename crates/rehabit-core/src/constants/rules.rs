// ABOUTME: Default thresholds and multipliers for risk, trend, and recommendation rules
// ABOUTME: All comparisons using these values are strict greater-than unless noted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

/// Pain ratings above this are high risk
pub const HIGH_PAIN_ABOVE: u8 = 7;

/// Pain ratings above this (and not high) are medium risk
pub const MEDIUM_PAIN_ABOVE: u8 = 4;

/// Pain improvement (%) above this trends `improving`
pub const PAIN_IMPROVEMENT_ABOVE_PCT: f64 = 50.0;

/// Mobility change (%) above this trends `excellent`
pub const MOBILITY_CHANGE_ABOVE_PCT: f64 = 50.0;

/// Consistency rate (%) above this trends `excellent`
pub const CONSISTENCY_ABOVE_PCT: f64 = 85.0;

/// Rep multiplier applied when exercises are reported too hard
pub const REDUCTION_MULTIPLIER: f64 = 0.8;

/// Rep multiplier applied otherwise
pub const PROGRESSION_MULTIPLIER: f64 = 1.2;

/// Mood ratings at or below this get extra wellness support (inclusive)
pub const LOW_MOOD_AT_OR_BELOW: u8 = 5;

/// Meditation sessions per week suggested for low mood
pub const LOW_MOOD_SESSIONS: u32 = 4;

/// Meditation sessions per week suggested otherwise
pub const BASELINE_SESSIONS: u32 = 3;

/// Fixed daily protein increment (grams)
pub const PROTEIN_INCREMENT_GRAMS: u32 = 10;

/// Extra rest days granted for high fatigue
pub const REST_DAY_INCREMENT: u32 = 1;

/// Reps assumed when the plan has no exercises to read from
pub const FALLBACK_REPS: u32 = 10;

/// Scaled reps never drop below this
pub const MIN_REPS: u32 = 1;
