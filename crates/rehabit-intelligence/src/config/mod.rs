// ABOUTME: Engine configuration with environment overrides and validation
// ABOUTME: EngineConfig bundles risk, recommendation, and adjustment rule sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Rehabit Contributors

//! # Engine Configuration
//!
//! `EngineConfig::load()` starts from defaults, applies `REHABIT_*`
//! environment overrides, then validates. `EngineConfig::global()` caches
//! the loaded configuration for the life of the process.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `REHABIT_HIGH_PAIN_ABOVE` | `risk.high_pain_above` |
//! | `REHABIT_MEDIUM_PAIN_ABOVE` | `risk.medium_pain_above` |
//! | `REHABIT_PAIN_IMPROVEMENT_ABOVE` | `risk.pain_improvement_above_pct` |
//! | `REHABIT_MOBILITY_CHANGE_ABOVE` | `risk.mobility_change_above_pct` |
//! | `REHABIT_CONSISTENCY_ABOVE` | `risk.consistency_above_pct` |
//! | `REHABIT_REDUCTION_MULTIPLIER` | `recommendations.reduction_multiplier` |
//! | `REHABIT_PROGRESSION_MULTIPLIER` | `recommendations.progression_multiplier` |
//! | `REHABIT_LOW_MOOD_AT_OR_BELOW` | `recommendations.low_mood_at_or_below` |
//! | `REHABIT_LOW_MOOD_SESSIONS` | `recommendations.low_mood_sessions` |
//! | `REHABIT_BASELINE_SESSIONS` | `recommendations.baseline_sessions` |
//! | `REHABIT_PROTEIN_INCREMENT` | `recommendations.protein_increment_grams` |
//! | `REHABIT_REST_DAY_INCREMENT` | `recommendations.rest_day_increment` |
//! | `REHABIT_MOBILITY_ON_STIFFNESS` | `adjustment.insert_mobility_on_stiffness` |
//! | `REHABIT_MOBILITY_EXERCISE` | `adjustment.mobility_exercise.name` |

mod engine;
mod error;

pub use engine::{AdjustmentRules, MobilityExercise, RecommendationRules, RiskThresholds};
pub use error::ConfigError;

use rehabit_core::constants::ranges::{MOOD_MAX, MOOD_MIN, PAIN_MAX};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Multipliers must lie in (0, `MAX_MULTIPLIER`]
const MAX_MULTIPLIER: f64 = 2.0;

/// Rule configuration for the adaptation engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Risk classifier thresholds
    pub risk: RiskThresholds,
    /// Recommendation generator constants
    pub recommendations: RecommendationRules,
    /// Plan adjuster constants
    pub adjustment: AdjustmentRules,
}

impl EngineConfig {
    /// Get the global configuration, loading it on first use
    pub fn global() -> &'static Self {
        ENGINE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load engine config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparseable value
    /// or the resulting configuration fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate threshold ordering and value ranges
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_risk()?;
        self.validate_recommendations()?;
        self.validate_adjustment()
    }

    fn validate_risk(&self) -> Result<(), ConfigError> {
        let risk = &self.risk;
        if risk.medium_pain_above >= risk.high_pain_above {
            return Err(ConfigError::InvalidRange(
                "medium_pain_above must be < high_pain_above",
            ));
        }
        if risk.high_pain_above > PAIN_MAX {
            return Err(ConfigError::ValueOutOfRange(
                "high_pain_above must be within the pain scale",
            ));
        }
        for pct in [
            risk.pain_improvement_above_pct,
            risk.mobility_change_above_pct,
            risk.consistency_above_pct,
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ConfigError::ValueOutOfRange(
                    "Trend thresholds must be between 0 and 100",
                ));
            }
        }
        Ok(())
    }

    fn validate_recommendations(&self) -> Result<(), ConfigError> {
        let recs = &self.recommendations;
        for multiplier in [recs.reduction_multiplier, recs.progression_multiplier] {
            if multiplier <= 0.0 || multiplier > MAX_MULTIPLIER {
                return Err(ConfigError::ValueOutOfRange(
                    "Rep multipliers must be in (0, 2]",
                ));
            }
        }
        if recs.reduction_multiplier >= recs.progression_multiplier {
            return Err(ConfigError::InvalidRange(
                "reduction_multiplier must be < progression_multiplier",
            ));
        }
        if !(MOOD_MIN..=MOOD_MAX).contains(&recs.low_mood_at_or_below) {
            return Err(ConfigError::ValueOutOfRange(
                "low_mood_at_or_below must be within the mood scale",
            ));
        }
        if recs.fallback_reps == 0 {
            return Err(ConfigError::ValueOutOfRange("fallback_reps must be positive"));
        }
        Ok(())
    }

    fn validate_adjustment(&self) -> Result<(), ConfigError> {
        let adjustment = &self.adjustment;
        if adjustment.min_reps == 0 {
            return Err(ConfigError::ValueOutOfRange("min_reps must be positive"));
        }
        if adjustment.mobility_exercise.name.trim().is_empty() {
            return Err(ConfigError::ValueOutOfRange(
                "mobility exercise name must not be empty",
            ));
        }
        if adjustment.mobility_exercise.reps == 0 || adjustment.mobility_exercise.sets == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "mobility exercise reps and sets must be positive",
            ));
        }
        Ok(())
    }

    /// Apply a single environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Risk classifier
        Self::apply_env_var("REHABIT_HIGH_PAIN_ABOVE", &mut self.risk.high_pain_above)?;
        Self::apply_env_var("REHABIT_MEDIUM_PAIN_ABOVE", &mut self.risk.medium_pain_above)?;
        Self::apply_env_var(
            "REHABIT_PAIN_IMPROVEMENT_ABOVE",
            &mut self.risk.pain_improvement_above_pct,
        )?;
        Self::apply_env_var(
            "REHABIT_MOBILITY_CHANGE_ABOVE",
            &mut self.risk.mobility_change_above_pct,
        )?;
        Self::apply_env_var(
            "REHABIT_CONSISTENCY_ABOVE",
            &mut self.risk.consistency_above_pct,
        )?;

        // Recommendation generator
        let recs = &mut self.recommendations;
        Self::apply_env_var("REHABIT_REDUCTION_MULTIPLIER", &mut recs.reduction_multiplier)?;
        Self::apply_env_var(
            "REHABIT_PROGRESSION_MULTIPLIER",
            &mut recs.progression_multiplier,
        )?;
        Self::apply_env_var("REHABIT_LOW_MOOD_AT_OR_BELOW", &mut recs.low_mood_at_or_below)?;
        Self::apply_env_var("REHABIT_LOW_MOOD_SESSIONS", &mut recs.low_mood_sessions)?;
        Self::apply_env_var("REHABIT_BASELINE_SESSIONS", &mut recs.baseline_sessions)?;
        Self::apply_env_var("REHABIT_PROTEIN_INCREMENT", &mut recs.protein_increment_grams)?;
        Self::apply_env_var("REHABIT_REST_DAY_INCREMENT", &mut recs.rest_day_increment)?;

        // Plan adjuster
        Self::apply_env_var(
            "REHABIT_MOBILITY_ON_STIFFNESS",
            &mut self.adjustment.insert_mobility_on_stiffness,
        )?;
        Self::apply_env_var(
            "REHABIT_MOBILITY_EXERCISE",
            &mut self.adjustment.mobility_exercise.name,
        )?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_pain_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.risk.medium_pain_above = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_multiplier_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.recommendations.progression_multiplier = 2.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    #[serial]
    fn test_env_override_applies() {
        env::set_var("REHABIT_PROTEIN_INCREMENT", "15");
        let config = EngineConfig::load();
        env::remove_var("REHABIT_PROTEIN_INCREMENT");
        assert_eq!(config.unwrap().recommendations.protein_increment_grams, 15);
    }

    #[test]
    #[serial]
    fn test_unparseable_override_fails() {
        env::set_var("REHABIT_HIGH_PAIN_ABOVE", "seven");
        let result = EngineConfig::load();
        env::remove_var("REHABIT_HIGH_PAIN_ABOVE");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
