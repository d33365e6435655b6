// ABOUTME: Runs a single adaptation cycle end to end for rehabit-cli
// ABOUTME: Reads feedback, waits on analysis and plan generation, then optionally confirms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use crate::helpers::display;
use anyhow::{anyhow, bail, Result};
use rehabit::config::AppConfig;
use rehabit::intelligence::RawFeedback;
use rehabit::models::ProgressSnapshot;
use rehabit::persistence::PlanRepository;
use rehabit::pipeline::{CycleTask, PipelineBuilder, TaskOutcome};
use rehabit::progress::StaticProgressSource;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Arguments of `rehabit-cli run`
pub struct RunOptions {
    pub feedback: PathBuf,
    pub confirm: bool,
    pub progress: ProgressSnapshot,
    pub json: bool,
}

/// Submit feedback, generate the plan delta, and confirm when asked
pub async fn run(
    config: &AppConfig,
    repository: PlanRepository,
    options: RunOptions,
) -> Result<()> {
    let raw = read_feedback(&options.feedback).await?;

    let controller = PipelineBuilder::new(config.patient_id, repository)
        .with_engine_config(config.engine.clone())
        .with_progress_source(Arc::new(StaticProgressSource::new(options.progress)))
        .build()
        .await?;

    controller.submit_feedback(&raw).await?;
    settle(controller.begin_analysis().await?).await?;
    settle(controller.begin_plan_generation().await?).await?;

    let view = controller.snapshot().await;
    let (Some(assessment), Some(delta)) = (&view.assessment, &view.delta) else {
        bail!("cycle finished without a plan ({})", view.phase);
    };

    if !options.json {
        display::display_analysis(assessment, &view.recommendations);
        display::display_delta(delta);
    }

    if !options.confirm {
        if options.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            println!(
                "\nPlan not applied. Re-run with --confirm to record week {}.",
                delta.week_number
            );
        }
        return Ok(());
    }

    let entry = controller.confirm_plan().await?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&controller.snapshot().await)?);
    } else {
        display::display_confirmation(&entry);
    }
    Ok(())
}

async fn settle(task: CycleTask) -> Result<()> {
    match task.wait().await {
        TaskOutcome::Applied => Ok(()),
        TaskOutcome::Discarded => bail!("cycle task was superseded before it finished"),
        TaskOutcome::Failed(error) => Err(error.into()),
    }
}

async fn read_feedback(path: &Path) -> Result<RawFeedback> {
    let json = if path.as_os_str() == "-" {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read feedback file {}: {e}", path.display()))?
    };
    Ok(serde_json::from_str(&json)?)
}
