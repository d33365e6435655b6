// ABOUTME: Append-only adaptation ledger keyed by strictly increasing week
// ABOUTME: Range queries and aggregates (change count, success rate, per-domain counts)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Adaptation Ledger
//!
//! Entries are only ever pushed at the end. The first entry may carry any
//! week `>= 1`; every later entry must be exactly one week after the
//! previous one. There is no API that edits or removes an entry.
//!
//! The ledger stores outcomes but never computes them; see
//! `rehabit_intelligence::outcome` for the classification policy.

use crate::errors::OrderingError;
use crate::models::{AdaptationHistoryEntry, AdaptationOutcome, PlanDomain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Aggregate view of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Number of recorded weeks
    pub weeks_tracked: usize,
    /// Sum of change lines across all entries
    pub total_changes: usize,
    /// Share of entries with a positive outcome (0.0 when empty)
    pub success_rate: f64,
    /// Most recent week, if any
    pub latest_week: Option<u32>,
}

/// Ordered, append-only history of confirmed adaptations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<AdaptationHistoryEntry>",
    into = "Vec<AdaptationHistoryEntry>"
)]
pub struct AdaptationLedger {
    entries: Vec<AdaptationHistoryEntry>,
}

impl AdaptationLedger {
    /// An empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a ledger from stored entries, re-checking week order
    ///
    /// # Errors
    ///
    /// Returns `OrderingError` at the first entry that breaks the sequence
    pub fn from_entries(
        entries: impl IntoIterator<Item = AdaptationHistoryEntry>,
    ) -> Result<Self, OrderingError> {
        let mut ledger = Self::new();
        for entry in entries {
            ledger.append(entry)?;
        }
        Ok(ledger)
    }

    /// The only week `append` will accept next, or `None` when empty
    #[must_use]
    pub fn next_week(&self) -> Option<u32> {
        self.latest_week().map(|week| week.saturating_add(1))
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns `OrderingError` for a duplicate, a gap, a step backwards, or
    /// a first week of 0. The ledger is unchanged on error.
    pub fn append(&mut self, entry: AdaptationHistoryEntry) -> Result<(), OrderingError> {
        let expected = self.next_week().unwrap_or(1);
        let accepted = if self.entries.is_empty() {
            entry.week >= 1
        } else {
            entry.week == expected
        };

        if !accepted {
            return Err(OrderingError {
                expected,
                actual: entry.week,
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// All entries in week order
    #[must_use]
    pub fn entries(&self) -> &[AdaptationHistoryEntry] {
        &self.entries
    }

    /// Entry for a single week
    #[must_use]
    pub fn get(&self, week: u32) -> Option<&AdaptationHistoryEntry> {
        self.range(week..=week).first()
    }

    /// Entries whose week falls within `weeks`
    #[must_use]
    pub fn range(&self, weeks: RangeInclusive<u32>) -> &[AdaptationHistoryEntry] {
        let start = self.entries.partition_point(|e| e.week < *weeks.start());
        let end = self.entries.partition_point(|e| e.week <= *weeks.end());
        self.entries.get(start..end).unwrap_or_default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no week has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent week
    #[must_use]
    pub fn latest_week(&self) -> Option<u32> {
        self.entries.last().map(|entry| entry.week)
    }

    /// Total change lines across all entries
    #[must_use]
    pub fn total_change_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.changes.len()).sum()
    }

    /// `count(positive) / count(*)`, or 0.0 for an empty ledger
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let positive = self
            .entries
            .iter()
            .filter(|entry| entry.outcome == AdaptationOutcome::Positive)
            .count();
        positive as f64 / self.entries.len() as f64
    }

    /// Change lines per plan domain
    #[must_use]
    pub fn changes_by_domain(&self) -> BTreeMap<PlanDomain, usize> {
        let mut counts = BTreeMap::new();
        for change in self.entries.iter().flat_map(|entry| &entry.changes) {
            *counts.entry(change.domain).or_insert(0) += 1;
        }
        counts
    }

    /// Aggregate summary
    #[must_use]
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            weeks_tracked: self.entries.len(),
            total_changes: self.total_change_count(),
            success_rate: self.success_rate(),
            latest_week: self.latest_week(),
        }
    }
}

impl TryFrom<Vec<AdaptationHistoryEntry>> for AdaptationLedger {
    type Error = OrderingError;

    fn try_from(entries: Vec<AdaptationHistoryEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<AdaptationLedger> for Vec<AdaptationHistoryEntry> {
    fn from(ledger: AdaptationLedger) -> Self {
        ledger.entries
    }
}
