// ABOUTME: Risk classification of weekly feedback against progress metrics
// ABOUTME: Pure rule evaluation producing risk level, fixed advisories, and metric trends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! Risk Classifier
//!
//! All thresholds are strict `>`: a value sitting exactly on a threshold
//! falls into the lower category.

use crate::config::{EngineConfig, RiskThresholds};
use rehabit_core::constants::advisories;
use rehabit_core::models::{
    FeedbackRecord, ProgressSnapshot, RiskAssessment, RiskLevel, Trend, TrendMetric,
};
use std::collections::BTreeMap;

/// Classifies feedback risk and metric trends
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskClassifier {
    /// Create a classifier from the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::global())
    }

    /// Create a classifier from explicit configuration
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.risk.clone(),
        }
    }

    /// Risk level for a pain rating
    #[must_use]
    pub const fn risk_level(&self, pain_level: u8) -> RiskLevel {
        if pain_level > self.thresholds.high_pain_above {
            RiskLevel::High
        } else if pain_level > self.thresholds.medium_pain_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Classify one cycle's feedback
    #[must_use]
    pub fn classify(
        &self,
        feedback: &FeedbackRecord,
        progress: &ProgressSnapshot,
    ) -> RiskAssessment {
        let risk_level = self.risk_level(feedback.pain_level.get());

        let alerts = if risk_level == RiskLevel::High {
            vec![
                advisories::MEDICAL_CONSULTATION.to_owned(),
                advisories::REDUCE_INTENSITY.to_owned(),
            ]
        } else {
            Vec::new()
        };

        RiskAssessment {
            risk_level,
            alerts,
            trends: self.trends(progress),
        }
    }

    fn trends(&self, progress: &ProgressSnapshot) -> BTreeMap<TrendMetric, Trend> {
        let pain = if progress.pain_improvement_pct > self.thresholds.pain_improvement_above_pct {
            Trend::Improving
        } else {
            Trend::Stable
        };
        let mobility = if progress.mobility_change_pct > self.thresholds.mobility_change_above_pct
        {
            Trend::Excellent
        } else {
            Trend::Good
        };
        let adherence = if progress.consistency_rate_pct > self.thresholds.consistency_above_pct {
            Trend::Excellent
        } else {
            Trend::Good
        };

        BTreeMap::from([
            (TrendMetric::Pain, pain),
            (TrendMetric::Mobility, mobility),
            (TrendMetric::Adherence, adherence),
        ])
    }
}
