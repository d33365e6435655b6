// ABOUTME: Read-only plan and adaptation history views for rehabit-cli
// ABOUTME: Loads persisted state and prints it as a report or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::helpers::display;
use anyhow::{bail, Result};
use rehabit::persistence::PlanRepository;
use serde_json::json;

/// Print the plan in force
pub async fn plan(repository: &PlanRepository, as_json: bool) -> Result<()> {
    let state = repository.load().await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&state.plan)?);
    } else {
        display::display_plan(&state.plan);
    }
    Ok(())
}

/// Print history entries within `from..=to` plus ledger aggregates
pub async fn history(
    repository: &PlanRepository,
    from: Option<u32>,
    to: Option<u32>,
    as_json: bool,
) -> Result<()> {
    let from = from.unwrap_or(1);
    let to = to.unwrap_or(u32::MAX);
    if from > to {
        bail!("--from ({from}) must not be after --to ({to})");
    }

    let state = repository.load().await?;
    let ledger = &state.history;
    let entries = ledger.range(from..=to);
    let summary = ledger.summary();

    if as_json {
        let body = json!({
            "entries": entries,
            "summary": summary,
            "changesByDomain": ledger.changes_by_domain(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        display::display_history(entries, &summary, &ledger.changes_by_domain());
    }
    Ok(())
}
