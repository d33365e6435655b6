// ABOUTME: Integration tests for the synchronous rule engine
// ABOUTME: Intake validation, risk levels, recommendation rules, plan adjustment, and outcome policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

mod common;

use chrono::{TimeZone, Utc};
use common::{cycle_date, default_engine, high_risk_feedback, low_risk_feedback, raw_feedback};
use rehabit::constants::advisories;
use rehabit::errors::FeedbackField;
use rehabit::intelligence::{
    FeedbackIntake, OutcomeClassifier, PlanAdjuster, RawFeedback, RecommendationEngine,
    RiskClassifier, RiskResponsivePolicy,
};
use rehabit::models::{
    AdaptationOutcome, BaselinePlan, Difficulty, Exercise, FeedbackRecord, ItemStatus,
    ProgressSnapshot, Recommendation, RecommendationCategory, RecommendationPriority, RiskLevel,
};
use uuid::Uuid;

fn accept(raw: &RawFeedback) -> FeedbackRecord {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    FeedbackIntake::accept(raw, Uuid::nil(), at).unwrap()
}

fn recommend(raw: &RawFeedback, plan: &BaselinePlan) -> Vec<Recommendation> {
    RecommendationEngine::with_config(&default_engine()).generate(&accept(raw), plan)
}

fn rec(recs: &[Recommendation], category: RecommendationCategory) -> &Recommendation {
    recs.iter().find(|r| r.category == category).unwrap()
}

// ============================================================================
// Intake
// ============================================================================

#[test]
fn test_intake_accepts_range_edges() {
    for (pain, mood) in [(0, 1), (10, 10)] {
        let record = accept(&raw_feedback(pain, mood, "too-easy", "moderate"));
        assert_eq!(i64::from(record.pain_level.get()), pain);
        assert_eq!(i64::from(record.mood.get()), mood);
        assert_eq!(record.difficulty, Difficulty::TooEasy);
    }
}

#[test]
fn test_intake_rejects_each_out_of_range_field() {
    let at = Utc::now();
    let cases = [
        (raw_feedback(-1, 5, "just-right", "low"), FeedbackField::PainLevel),
        (raw_feedback(3, 0, "just-right", "low"), FeedbackField::Mood),
        (raw_feedback(3, 11, "just-right", "low"), FeedbackField::Mood),
        (raw_feedback(3, 5, "impossible", "low"), FeedbackField::Difficulty),
        (raw_feedback(3, 5, "just-right", "extreme"), FeedbackField::Fatigue),
    ];
    for (raw, field) in cases {
        let error = FeedbackIntake::accept(&raw, Uuid::nil(), at).unwrap_err();
        assert_eq!(error.field, field, "{error}");
    }

    let mut raw = low_risk_feedback();
    raw.prefer_guided = Some("maybe".to_owned());
    let error = FeedbackIntake::accept(&raw, Uuid::nil(), at).unwrap_err();
    assert_eq!(error.field, FeedbackField::PreferGuided);
}

#[test]
fn test_intake_parses_camel_case_json() {
    let raw: RawFeedback = serde_json::from_str(
        r#"{"painLevel":6,"mood":7,"difficulty":"just-right","fatigue":"moderate",
            "stiffness":true,"painNote":"  mild ache  ","preferGuided":"no"}"#,
    )
    .unwrap();
    let record = accept(&raw);
    assert!(record.stiffness);
    assert_eq!(record.pain_note.as_deref(), Some("mild ache"));
    assert!(!record.prefer_guided.is_guided());
    assert!(record.doctor_comments.is_none());
}

// ============================================================================
// Risk classification
// ============================================================================

#[test]
fn test_risk_levels_and_advisories() {
    let classifier = RiskClassifier::with_config(&default_engine());
    let progress = ProgressSnapshot::default();

    let high = classifier.classify(&accept(&high_risk_feedback()), &progress);
    assert_eq!(high.risk_level, RiskLevel::High);
    assert_eq!(
        high.alerts,
        vec![
            advisories::MEDICAL_CONSULTATION.to_owned(),
            advisories::REDUCE_INTENSITY.to_owned()
        ]
    );

    let medium = classifier.classify(&accept(&raw_feedback(7, 6, "just-right", "low")), &progress);
    assert_eq!(medium.risk_level, RiskLevel::Medium);
    assert!(medium.alerts.is_empty());

    let low = classifier.classify(&accept(&raw_feedback(4, 6, "just-right", "low")), &progress);
    assert_eq!(low.risk_level, RiskLevel::Low);
    assert_eq!(low.trends.len(), 3);
}

// ============================================================================
// Recommendations
// ============================================================================

#[test]
fn test_recommendations_come_in_category_order() {
    let recs = recommend(&low_risk_feedback(), &BaselinePlan::starter_program());
    let categories: Vec<_> = recs.iter().map(|r| r.category).collect();
    assert_eq!(categories, RecommendationCategory::ORDER.to_vec());
}

#[test]
fn test_too_hard_reduces_and_otherwise_progresses() {
    let plan = BaselinePlan::starter_program();

    let recs = recommend(&raw_feedback(3, 6, "too-hard", "moderate"), &plan);
    let exercise = rec(&recs, RecommendationCategory::ExerciseIntensity);
    assert_eq!((exercise.current, exercise.suggested), (10, 8));
    assert_eq!(exercise.priority, RecommendationPriority::High);

    for difficulty in ["too-easy", "just-right"] {
        let recs = recommend(&raw_feedback(3, 6, difficulty, "moderate"), &plan);
        let exercise = rec(&recs, RecommendationCategory::ExerciseIntensity);
        assert_eq!(exercise.suggested, 12, "{difficulty}");
    }
}

#[test]
fn test_mood_boundary_is_inclusive() {
    let plan = BaselinePlan::starter_program();

    let recs = recommend(&raw_feedback(3, 5, "just-right", "low"), &plan);
    let wellness = rec(&recs, RecommendationCategory::MentalWellness);
    assert_eq!(wellness.suggested, 4);
    assert_eq!(wellness.priority, RecommendationPriority::High);

    let recs = recommend(&raw_feedback(3, 6, "just-right", "low"), &plan);
    let wellness = rec(&recs, RecommendationCategory::MentalWellness);
    assert_eq!(wellness.suggested, 3);
    assert_eq!(wellness.priority, RecommendationPriority::Medium);
}

#[test]
fn test_only_high_fatigue_adds_rest_day() {
    let plan = BaselinePlan::starter_program();
    for (fatigue, expected, priority) in [
        ("low", 1, RecommendationPriority::Low),
        ("moderate", 1, RecommendationPriority::Low),
        ("high", 2, RecommendationPriority::High),
    ] {
        let recs = recommend(&raw_feedback(3, 6, "just-right", fatigue), &plan);
        let recovery = rec(&recs, RecommendationCategory::RecoveryDays);
        assert_eq!(recovery.suggested, expected, "{fatigue}");
        assert_eq!(recovery.priority, priority, "{fatigue}");
    }

    let nutrition = rec(
        &recommend(&low_risk_feedback(), &plan),
        RecommendationCategory::Nutrition,
    )
    .clone();
    assert_eq!(nutrition.suggested, nutrition.current + 10);
}

#[test]
fn test_empty_plan_falls_back_to_default_reps() {
    let plan = BaselinePlan {
        exercises: Vec::new(),
        ..BaselinePlan::starter_program()
    };
    let recs = recommend(&raw_feedback(3, 6, "too-hard", "low"), &plan);
    let exercise = rec(&recs, RecommendationCategory::ExerciseIntensity);
    assert_eq!((exercise.current, exercise.suggested), (10, 8));
}

// ============================================================================
// Plan adjustment
// ============================================================================

#[test]
fn test_adjuster_is_deterministic() {
    let plan = BaselinePlan::starter_program();
    let feedback = accept(&high_risk_feedback());
    let recs = recommend(&high_risk_feedback(), &plan);
    let adjuster = PlanAdjuster::with_config(&default_engine());

    let first = adjuster.adjust(&plan, &recs, &feedback, cycle_date()).unwrap();
    let second = adjuster.adjust(&plan, &recs, &feedback, cycle_date()).unwrap();
    assert_eq!(first, second);
    first.verify_exercise_identity().unwrap();
}

#[test]
fn test_stiffness_inserts_mobility_exercise_once() {
    let adjuster = PlanAdjuster::with_config(&default_engine());
    let mut raw = raw_feedback(3, 6, "just-right", "low");
    raw.stiffness = true;
    let feedback = accept(&raw);

    let plan = BaselinePlan::starter_program();
    let recs = recommend(&raw, &plan);
    let delta = adjuster.adjust(&plan, &recs, &feedback, cycle_date()).unwrap();
    let pumps = delta.exercises.after_named("Ankle Pumps").unwrap();
    assert_eq!(pumps.status, ItemStatus::New);
    assert_eq!(delta.exercises.after.len(), 4);

    // already present: scaled with the rest, never duplicated or flagged new
    let plan = delta.adjusted_plan();
    let recs = recommend(&raw, &plan);
    let delta = adjuster.adjust(&plan, &recs, &feedback, cycle_date()).unwrap();
    assert_eq!(delta.exercises.after.len(), 4);
    assert!(!delta.exercises.after_named("Ankle Pumps").unwrap().is_new());
}

#[test]
fn test_unchanged_values_stay_unchanged() {
    // a single-rep exercise cannot shrink below the floor
    let plan = BaselinePlan {
        exercises: vec![Exercise::new("Toe Raises", 1, 1, "2 min")],
        ..BaselinePlan::starter_program()
    };
    let raw = raw_feedback(3, 6, "too-hard", "low");
    let recs = recommend(&raw, &plan);
    let delta = PlanAdjuster::with_config(&default_engine())
        .adjust(&plan, &recs, &accept(&raw), cycle_date())
        .unwrap();

    assert_eq!(delta.exercises.after[0].status, ItemStatus::Unchanged);
    assert!(!delta.rest_days.is_changed());
    assert_eq!(delta.nutrition.after.calories, delta.nutrition.before.calories);
}

#[test]
fn test_every_exercise_scales_by_the_configured_multiplier() {
    let adjuster = PlanAdjuster::with_config(&default_engine());
    let plan_led_by = |reps| BaselinePlan {
        exercises: vec![
            Exercise::new("Calf Raises", reps, 3, "5 min"),
            Exercise::new("Quad Sets", 15, 3, "5 min"),
        ],
        ..BaselinePlan::starter_program()
    };

    // 2 * 1.2 rounds back to 2; the rest of the plan still progresses
    let raw = raw_feedback(3, 6, "too-easy", "low");
    let plan = plan_led_by(2);
    let recs = recommend(&raw, &plan);
    assert_eq!(rec(&recs, RecommendationCategory::ExerciseIntensity).suggested, 2);
    let delta = adjuster.adjust(&plan, &recs, &accept(&raw), cycle_date()).unwrap();
    let lead = delta.exercises.after_named("Calf Raises").unwrap();
    assert_eq!(lead.exercise.reps, 2);
    assert_eq!(lead.status, ItemStatus::Unchanged);
    let quads = delta.exercises.after_named("Quad Sets").unwrap();
    assert_eq!(quads.exercise.reps, 18);
    assert_eq!(quads.status, ItemStatus::Changed);

    // 7 * 0.8 = 5.6 rounds to 6, which must not leak into the other exercises
    let raw = raw_feedback(3, 6, "too-hard", "low");
    let plan = plan_led_by(7);
    let recs = recommend(&raw, &plan);
    let delta = adjuster.adjust(&plan, &recs, &accept(&raw), cycle_date()).unwrap();
    assert_eq!(delta.exercises.after_named("Calf Raises").unwrap().exercise.reps, 6);
    assert_eq!(delta.exercises.after_named("Quad Sets").unwrap().exercise.reps, 12);
}

// ============================================================================
// Outcome policy
// ============================================================================

#[test]
fn test_outcome_policy() {
    let engine = default_engine();
    let classifier = RiskClassifier::with_config(&engine);
    let adjuster = PlanAdjuster::with_config(&engine);
    let plan = BaselinePlan::starter_program();
    let progress = ProgressSnapshot::default();

    let outcome_for = |raw: &RawFeedback| {
        let feedback = accept(raw);
        let assessment = classifier.classify(&feedback, &progress);
        let recs = recommend(raw, &plan);
        let delta = adjuster.adjust(&plan, &recs, &feedback, cycle_date()).unwrap();
        RiskResponsivePolicy.classify(&assessment, &delta)
    };

    // high risk, backs off with an extra rest day
    assert_eq!(outcome_for(&high_risk_feedback()), AdaptationOutcome::Positive);
    // high risk yet progressing load with no extra support
    assert_eq!(
        outcome_for(&raw_feedback(9, 8, "just-right", "low")),
        AdaptationOutcome::Negative
    );
    // low risk, routine progression
    assert_eq!(outcome_for(&low_risk_feedback()), AdaptationOutcome::Neutral);
    // low mood adds meditation regardless of risk
    assert_eq!(
        outcome_for(&raw_feedback(2, 3, "just-right", "low")),
        AdaptationOutcome::Positive
    );
}
