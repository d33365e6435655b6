// ABOUTME: Tests for the append-only adaptation ledger
// ABOUTME: Week ordering, range queries, aggregates, and serde round-trip validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use chrono::{Days, NaiveDate};
use rehabit::errors::{AppError, ErrorCode, OrderingError};
use rehabit::ledger::AdaptationLedger;
use rehabit::models::{AdaptationHistoryEntry, AdaptationOutcome, PlanChange, PlanDomain};

fn entry(week: u32, outcome: AdaptationOutcome, domains: &[PlanDomain]) -> AdaptationHistoryEntry {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    AdaptationHistoryEntry {
        week,
        date: start + Days::new(u64::from(week) * 7),
        changes: domains
            .iter()
            .map(|&domain| PlanChange::new(domain, format!("week {week} change"), "reason"))
            .collect(),
        outcome,
    }
}

fn four_weeks() -> AdaptationLedger {
    AdaptationLedger::from_entries([
        entry(1, AdaptationOutcome::Positive, &[PlanDomain::Exercise, PlanDomain::Nutrition]),
        entry(2, AdaptationOutcome::Neutral, &[PlanDomain::Exercise]),
        entry(3, AdaptationOutcome::Positive, &[PlanDomain::Wellness, PlanDomain::RestDays]),
        entry(4, AdaptationOutcome::Negative, &[PlanDomain::Exercise]),
    ])
    .unwrap()
}

#[test]
fn test_duplicate_week_is_rejected_and_ledger_unchanged() {
    let mut ledger = four_weeks();
    let before = ledger.clone();

    let error = ledger
        .append(entry(4, AdaptationOutcome::Neutral, &[]))
        .unwrap_err();
    assert_eq!(error, OrderingError { expected: 5, actual: 4 });
    assert_eq!(ledger, before);
    assert_eq!(AppError::from(error).code, ErrorCode::OrderingViolation);
}

#[test]
fn test_gaps_and_backwards_steps_are_rejected() {
    let mut ledger = four_weeks();
    assert!(ledger.append(entry(6, AdaptationOutcome::Neutral, &[])).is_err());
    assert!(ledger.append(entry(2, AdaptationOutcome::Neutral, &[])).is_err());
    assert_eq!(ledger.next_week(), Some(5));
    ledger.append(entry(5, AdaptationOutcome::Neutral, &[])).unwrap();
    assert_eq!(ledger.latest_week(), Some(5));
}

#[test]
fn test_first_entry_may_start_after_week_one_but_not_zero() {
    let mut ledger = AdaptationLedger::new();
    assert_eq!(
        ledger.append(entry(0, AdaptationOutcome::Neutral, &[])),
        Err(OrderingError { expected: 1, actual: 0 })
    );
    ledger.append(entry(3, AdaptationOutcome::Neutral, &[])).unwrap();
    assert_eq!(ledger.next_week(), Some(4));
}

#[test]
fn test_range_is_inclusive_and_ordered() {
    let ledger = four_weeks();
    let weeks: Vec<u32> = ledger.range(2..=3).iter().map(|e| e.week).collect();
    assert_eq!(weeks, vec![2, 3]);
    assert!(ledger.range(7..=9).is_empty());
    assert_eq!(ledger.range(0..=u32::MAX).len(), 4);
    assert_eq!(ledger.get(3).unwrap().week, 3);
    assert!(ledger.get(9).is_none());
}

#[test]
fn test_aggregates() {
    let ledger = four_weeks();
    assert_eq!(ledger.total_change_count(), 6);
    assert_eq!(ledger.success_rate(), 0.5);

    let by_domain = ledger.changes_by_domain();
    assert_eq!(by_domain[&PlanDomain::Exercise], 3);
    assert_eq!(by_domain[&PlanDomain::RestDays], 1);

    let summary = ledger.summary();
    assert_eq!(summary.weeks_tracked, 4);
    assert_eq!(summary.latest_week, Some(4));

    let empty = AdaptationLedger::new();
    assert_eq!(empty.success_rate(), 0.0);
    assert_eq!(empty.summary().latest_week, None);
}

#[test]
fn test_deserializing_out_of_order_history_fails() {
    let json = serde_json::to_string(&four_weeks()).unwrap();
    let restored: AdaptationLedger = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, four_weeks());

    let shuffled = serde_json::to_string(&vec![
        entry(2, AdaptationOutcome::Neutral, &[]),
        entry(1, AdaptationOutcome::Neutral, &[]),
    ])
    .unwrap();
    assert!(serde_json::from_str::<AdaptationLedger>(&shuffled).is_err());
}
