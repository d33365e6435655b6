// ABOUTME: Output formatting helpers for rehabit-cli
// ABOUTME: Consistent report layout for analysis, plan deltas, confirmations, and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

use rehabit::ledger::LedgerSummary;
use rehabit::models::{
    AdaptationHistoryEntry, AdjustedPlanDelta, BaselinePlan, Exercise, ItemStatus, PlanDomain,
    Recommendation, RiskAssessment, ValueDelta,
};
use std::collections::BTreeMap;
use std::fmt::Display;

fn heading(title: &str, width: usize) {
    println!("\n{title}");
    println!("{}", "=".repeat(width));
}

fn exercise_line(exercise: &Exercise) -> String {
    format!(
        "{} {}x{} ({})",
        exercise.name, exercise.sets, exercise.reps, exercise.duration_label
    )
}

fn value_line<T: Display + PartialEq>(label: &str, delta: &ValueDelta<T>) {
    if delta.is_changed() {
        println!("   {label}: {} -> {}", delta.before, delta.after);
    } else {
        println!("   {label}: {}", delta.after);
    }
}

/// Display risk level, alerts, trends, and recommendations
pub fn display_analysis(assessment: &RiskAssessment, recommendations: &[Recommendation]) {
    heading("RISK ASSESSMENT", 60);
    println!("   Risk level: {}", assessment.risk_level.as_str().to_uppercase());
    for alert in &assessment.alerts {
        println!("   ! {alert}");
    }
    for (metric, trend) in &assessment.trends {
        println!("   {}: {trend}", metric.as_str());
    }

    heading("RECOMMENDATIONS", 60);
    for rec in recommendations {
        println!(
            "   [{}] {}: {} -> {}",
            rec.priority.as_str(),
            rec.category.title(),
            rec.current_display(),
            rec.suggested_display()
        );
        println!("      {}", rec.reason);
    }
}

/// Display the before/after plan delta
pub fn display_delta(delta: &AdjustedPlanDelta) {
    heading(
        &format!("WEEK {} PLAN (starts {})", delta.week_number, delta.start_date),
        60,
    );

    println!("Exercises:");
    for before in &delta.exercises.before {
        println!("   before  {}", exercise_line(before));
    }
    for after in &delta.exercises.after {
        let marker = match after.status {
            ItemStatus::New => "NEW",
            ItemStatus::Changed => "CHANGED",
            ItemStatus::Unchanged => "",
        };
        println!("   after   {} {marker}", exercise_line(&after.exercise));
    }

    println!("Nutrition:");
    let protein = ValueDelta::new(
        delta.nutrition.before.protein_grams,
        delta.nutrition.after.protein_grams,
    );
    value_line("Protein (g/day)", &protein);
    println!("   Calories: {}", delta.nutrition.after.calories);
    println!("   Water (glasses): {}", delta.nutrition.after.water_glasses);

    println!("Wellness:");
    let meditation = ValueDelta::new(
        delta.wellness.before.meditation_sessions_per_week,
        delta.wellness.after.meditation_sessions_per_week,
    );
    value_line("Meditation (sessions/week)", &meditation);
    println!(
        "   Journaling (per week): {}",
        delta.wellness.after.journaling_per_week
    );

    println!("Recovery:");
    value_line("Rest days/week", &delta.rest_days);
}

/// Display a confirmed adaptation
pub fn display_confirmation(entry: &AdaptationHistoryEntry) {
    heading(&format!("WEEK {} CONFIRMED", entry.week), 60);
    println!("   Date: {}", entry.date);
    println!("   Outcome: {}", entry.outcome);
    for change in &entry.changes {
        println!("   - [{}] {}", change.domain, change.detail);
        println!("     {}", change.reason);
    }
}

/// Display the plan in force
pub fn display_plan(plan: &BaselinePlan) {
    let title = if plan.week == 0 {
        "STARTER PROGRAM".to_owned()
    } else {
        format!("CURRENT PLAN (week {})", plan.week)
    };
    heading(&title, 50);

    println!("Exercises:");
    for exercise in &plan.exercises {
        println!("   {}", exercise_line(exercise));
    }
    println!(
        "Nutrition: {} g protein, {} kcal, {} glasses water",
        plan.nutrition.protein_grams, plan.nutrition.calories, plan.nutrition.water_glasses
    );
    println!(
        "Wellness: {} meditation/week, {} journaling/week, {} min breathing/day",
        plan.wellness.meditation_sessions_per_week,
        plan.wellness.journaling_per_week,
        plan.wellness.breathing_minutes_per_day
    );
    println!("Rest days: {}/week", plan.rest_days_per_week);
}

/// Display history entries and ledger aggregates
pub fn display_history(
    entries: &[AdaptationHistoryEntry],
    summary: &LedgerSummary,
    by_domain: &BTreeMap<PlanDomain, usize>,
) {
    heading("ADAPTATION HISTORY", 60);
    if entries.is_empty() {
        println!("   No adaptations recorded in this range.");
    }
    for entry in entries {
        println!(
            "   Week {:>3}  {}  {:<8}  {} changes",
            entry.week,
            entry.date,
            entry.outcome.as_str(),
            entry.changes.len()
        );
    }

    heading("SUMMARY", 60);
    println!("   Weeks tracked: {}", summary.weeks_tracked);
    println!("   Total changes: {}", summary.total_changes);
    println!("   Success rate: {:.0}%", summary.success_rate * 100.0);
    for (domain, count) in by_domain {
        println!("   {domain}: {count}");
    }
}
