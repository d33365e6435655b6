// ABOUTME: Permanent adaptation history records written on plan confirmation
// ABOUTME: AdaptationHistoryEntry keyed by week, with ordered changes and an outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome assigned to a confirmed adaptation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationOutcome {
    /// The adaptation responded to the patient's state
    Positive,
    /// No clear effect either way
    Neutral,
    /// The adaptation worked against the patient's state
    Negative,
}

impl AdaptationOutcome {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for AdaptationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan area a change belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanDomain {
    /// Exercise list
    Exercise,
    /// Nutrition targets
    Nutrition,
    /// Wellness targets
    Wellness,
    /// Rest days
    RestDays,
}

impl PlanDomain {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Nutrition => "nutrition",
            Self::Wellness => "wellness",
            Self::RestDays => "rest-days",
        }
    }
}

impl fmt::Display for PlanDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an adaptation's change list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanChange {
    /// Plan area
    pub domain: PlanDomain,
    /// What changed
    pub detail: String,
    /// Why it changed
    pub reason: String,
}

impl PlanChange {
    /// Create a change line
    pub fn new(domain: PlanDomain, detail: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            domain,
            detail: detail.into(),
            reason: reason.into(),
        }
    }
}

/// Permanent record of one confirmed adaptation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptationHistoryEntry {
    /// Program week, strictly increasing across the ledger
    pub week: u32,
    /// Date the adapted plan takes effect
    pub date: NaiveDate,
    /// Ordered change list
    pub changes: Vec<PlanChange>,
    /// Outcome assigned by the outcome policy
    pub outcome: AdaptationOutcome,
}
