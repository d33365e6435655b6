// ABOUTME: Rehabit CLI - runs adaptation cycles and inspects plan state from the terminal
// ABOUTME: Submits feedback, shows analysis and plan delta, confirms, and prints history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors
//!
//! Usage:
//! ```bash
//! # Preview this week's adaptation without applying it
//! rehabit-cli run --feedback feedback.json
//!
//! # Apply it and append to the adaptation history
//! rehabit-cli run --feedback feedback.json --confirm
//!
//! # Feedback from stdin with progress metrics
//! echo '{"painLevel":3,...}' | rehabit-cli run --feedback - --pain-improvement 20
//!
//! # Show the plan in force
//! rehabit-cli plan
//!
//! # Show weeks 2 through 5 of the history
//! rehabit-cli history --from 2 --to 5
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rehabit::config::{AppConfig, DatabaseUrl, StoreBackend};
use rehabit::logging::LoggingConfig;
use rehabit::models::ProgressSnapshot;
use rehabit::persistence::{open_store, PlanRepository};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use commands::cycle::RunOptions;

#[derive(Parser)]
#[command(
    name = "rehabit-cli",
    about = "Rehabit adaptive recovery plan CLI",
    long_about = "Turns weekly patient feedback into a risk assessment, recommendations, and a reviewed change to the rehabilitation plan."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Keep plan and history in memory only
    #[arg(long, global = true)]
    memory: bool,

    /// Patient id override
    #[arg(long, global = true)]
    patient_id: Option<Uuid>,

    /// Print JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Run one adaptation cycle
    Run {
        /// Feedback JSON file, or `-` for stdin
        #[arg(long)]
        feedback: PathBuf,

        /// Apply the plan and record it in the history
        #[arg(long)]
        confirm: bool,

        /// Pain improvement since baseline, percent
        #[arg(long, default_value = "0")]
        pain_improvement: f64,

        /// Mobility change since baseline, percent
        #[arg(long, default_value = "0")]
        mobility_change: f64,

        /// Session consistency, percent
        #[arg(long, default_value = "0")]
        consistency: f64,
    },

    /// Show the plan in force
    Plan,

    /// Show the adaptation history
    History {
        /// First week to include
        #[arg(long)]
        from: Option<u32>,

        /// Last week to include
        #[arg(long)]
        to: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(url)?;
    }
    if cli.memory {
        config.store = StoreBackend::Memory;
    }
    if let Some(patient_id) = cli.patient_id {
        config.patient_id = patient_id;
    }

    info!(store = %config.store, patient.id = %config.patient_id, "Rehabit CLI");
    let repository = PlanRepository::new(open_store(&config).await?);

    match cli.command {
        Command::Run {
            feedback,
            confirm,
            pain_improvement,
            mobility_change,
            consistency,
        } => {
            let options = RunOptions {
                feedback,
                confirm,
                progress: ProgressSnapshot::new(pain_improvement, mobility_change, consistency),
                json: cli.json,
            };
            commands::cycle::run(&config, repository, options).await?;
        }
        Command::Plan => {
            commands::history::plan(&repository, cli.json).await?;
        }
        Command::History { from, to } => {
            commands::history::history(&repository, from, to, cli.json).await?;
        }
    }

    Ok(())
}
