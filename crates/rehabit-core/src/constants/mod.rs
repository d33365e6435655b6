// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Persistence keys, advisory messages, rule defaults, and the starter program
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Default thresholds and multipliers for the rule engine
pub mod rules;

/// Logical keys of the persistence port
pub mod storage_keys {
    /// Key holding the `BaselinePlan` in force
    pub const CURRENT_PLAN: &str = "currentPlan";
    /// Key holding the ordered adaptation history
    pub const ADAPTATION_HISTORY: &str = "adaptationHistory";
}

/// Fixed advisory strings emitted for high-risk feedback
pub mod advisories {
    /// First advisory: seek medical advice for persistent pain
    pub const MEDICAL_CONSULTATION: &str =
        "Consider consulting your doctor or physiotherapist if the pain persists";
    /// Second advisory: temporary intensity reduction
    pub const REDUCE_INTENSITY: &str =
        "Reduce exercise intensity by 30% for the next 3 days";
}

/// Valid input ranges for feedback ratings
pub mod ranges {
    /// Lowest pain rating
    pub const PAIN_MIN: u8 = 0;
    /// Highest pain rating
    pub const PAIN_MAX: u8 = 10;
    /// Lowest mood rating
    pub const MOOD_MIN: u8 = 1;
    /// Highest mood rating
    pub const MOOD_MAX: u8 = 10;
}

/// Starter program used when no plan has been stored yet
pub mod starter_program {
    /// Week number of the starter program
    pub const WEEK: u32 = 0;
    /// `(name, reps, sets, duration label)` for each starter exercise
    pub const EXERCISES: &[(&str, u32, u32, &str)] = &[
        ("Knee Flexion", 10, 3, "10 min"),
        ("Quad Sets", 15, 3, "5 min"),
        ("Heel Slides", 12, 2, "8 min"),
    ];
    /// Daily protein target (grams)
    pub const PROTEIN_GRAMS: u32 = 120;
    /// Daily calorie target
    pub const CALORIES: u32 = 2200;
    /// Daily water target (glasses)
    pub const WATER_GLASSES: u32 = 8;
    /// Meditation sessions per week
    pub const MEDITATION_SESSIONS: u32 = 3;
    /// Journaling entries per week
    pub const JOURNALING_SESSIONS: u32 = 2;
    /// Breathing practice minutes per day
    pub const BREATHING_MINUTES: u32 = 5;
    /// Rest days per week
    pub const REST_DAYS: u32 = 1;
}

/// Service identifiers used in structured logging
pub mod service_names {
    /// Main service name
    pub const REHABIT: &str = "rehabit";
}
