// ABOUTME: Criterion benchmarks for the rule engine and the adaptation cycle
// ABOUTME: Measures classification, recommendation, plan adjustment, and a full confirmed cycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Criterion benchmarks for the adaptation engine.
//!
//! The rule stages are pure and synchronous; the cycle benchmark drives a
//! controller over an in-memory store on a Tokio runtime.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rehabit::clock::FixedClock;
use rehabit::intelligence::{
    EngineConfig, FeedbackIntake, PlanAdjuster, RawFeedback, RecommendationEngine, RiskClassifier,
};
use rehabit::models::{BaselinePlan, Exercise, FeedbackRecord, ProgressSnapshot};
use rehabit::persistence::{InMemoryStore, PlanRepository};
use rehabit::pipeline::PipelineBuilder;
use rehabit::progress::StaticProgressSource;
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

fn raw(pain: i64, mood: i64, difficulty: &str, fatigue: &str, stiffness: bool) -> RawFeedback {
    RawFeedback {
        pain_level: Some(pain),
        mood: Some(mood),
        difficulty: Some(difficulty.to_owned()),
        fatigue: Some(fatigue.to_owned()),
        stiffness,
        pain_note: None,
        prefer_guided: Some("yes".to_owned()),
        doctor_comments: None,
    }
}

fn record(raw: &RawFeedback) -> FeedbackRecord {
    FeedbackIntake::accept(raw, Uuid::nil(), Utc::now()).unwrap()
}

/// Starter program padded out to `count` exercises
fn plan_with_exercises(count: usize) -> BaselinePlan {
    let mut plan = BaselinePlan::starter_program();
    plan.exercises = (0..count)
        .map(|i| {
            let reps = u32::try_from(8 + i % 10).unwrap_or(10);
            Exercise::new(format!("Exercise {i}"), reps, 3, "5 min")
        })
        .collect();
    plan
}

fn bench_intake(c: &mut Criterion) {
    let mut group = c.benchmark_group("intake");
    let feedback = raw(6, 5, "just-right", "moderate", true);

    group.bench_function("accept_valid", |b| {
        b.iter(|| FeedbackIntake::accept(black_box(&feedback), Uuid::nil(), Utc::now()));
    });

    let invalid = raw(6, 11, "just-right", "moderate", false);
    group.bench_function("reject_invalid", |b| {
        b.iter(|| FeedbackIntake::accept(black_box(&invalid), Uuid::nil(), Utc::now()));
    });

    group.finish();
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");
    let engine = EngineConfig::default();
    let classifier = RiskClassifier::with_config(&engine);
    let recommender = RecommendationEngine::with_config(&engine);
    let feedback = record(&raw(8, 4, "too-hard", "high", true));
    let progress = ProgressSnapshot::new(35.0, 12.0, 82.0);
    let plan = BaselinePlan::starter_program();

    group.bench_function("classify", |b| {
        b.iter(|| classifier.classify(black_box(&feedback), black_box(&progress)));
    });

    group.bench_function("recommend", |b| {
        b.iter(|| recommender.generate(black_box(&feedback), black_box(&plan)));
    });

    group.finish();
}

fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    let engine = EngineConfig::default();
    let recommender = RecommendationEngine::with_config(&engine);
    let adjuster = PlanAdjuster::with_config(&engine);
    let feedback = record(&raw(8, 4, "too-hard", "high", true));
    let cycle_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    for count in [3_usize, 25, 100] {
        let plan = plan_with_exercises(count);
        let recs = recommender.generate(&feedback, &plan);
        group.bench_with_input(BenchmarkId::new("exercises", count), &plan, |b, plan| {
            b.iter(|| {
                adjuster
                    .adjust(black_box(plan), black_box(&recs), &feedback, cycle_date)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_full_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle");
    group.sample_size(50);
    let runtime = Runtime::new().unwrap();
    let feedback = &raw(8, 4, "too-hard", "high", true);
    let cycle_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    group.bench_function("submit_to_confirm_in_memory", |b| {
        b.to_async(&runtime).iter(|| async move {
            let repository = PlanRepository::new(Arc::new(InMemoryStore::new()));
            let controller = PipelineBuilder::new(Uuid::nil(), repository)
                .with_clock(Arc::new(FixedClock::at_date(cycle_date)))
                .with_engine_config(EngineConfig::default())
                .with_progress_source(Arc::new(StaticProgressSource::new(
                    ProgressSnapshot::new(35.0, 12.0, 82.0),
                )))
                .build()
                .await
                .unwrap();

            controller.submit_feedback(feedback).await.unwrap();
            assert!(controller.begin_analysis().await.unwrap().wait().await.is_applied());
            assert!(controller
                .begin_plan_generation()
                .await
                .unwrap()
                .wait()
                .await
                .is_applied());
            black_box(controller.confirm_plan().await.unwrap())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_intake,
    bench_rules,
    bench_adjust,
    bench_full_cycle
);
criterion_main!(benches);
