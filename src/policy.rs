//! Tunable scheduling constants.
//!
//! Defaults reproduce the observed behaviour of the mastery queue. A policy can
//! be loaded from a JSON file; missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::scheduler::{MAX_SCORE, MIN_SCORE};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const EASE_FLOOR: f64 = 1.3;
pub const INITIAL_INTERVAL_DAYS: i32 = 1;
/// Upper bound accepted for `max_interval_days`; keeps due dates inside chrono's range.
pub const INTERVAL_LIMIT_DAYS: i32 = 1_000_000;

/// Constants used by the review-state updater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerPolicy {
    /// Scores at or below this value count as a lapse.
    pub failure_threshold: u8,
    /// Score that leaves the ease factor unchanged on success.
    pub neutral_score: u8,
    pub ease_penalty: f64,
    pub ease_bonus_per_level: f64,
    pub ease_floor: f64,
    pub reset_interval_days: i32,
    /// Successful reviews never schedule further out than this.
    pub max_interval_days: i32,
    pub session: SessionWeights,
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 2,
            neutral_score: 3,
            ease_penalty: 0.2,
            ease_bonus_per_level: 0.1,
            ease_floor: EASE_FLOOR,
            reset_interval_days: 1,
            max_interval_days: 36500,
            session: SessionWeights::default(),
        }
    }
}

/// Constants used to weight items when building a practice queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionWeights {
    /// Nominal ceiling of the ease scale.
    pub max_ease: f64,
    pub ease_weight: f64,
    /// Intervals longer than this stop adding weight.
    pub interval_cap_days: i32,
    pub interval_weight: f64,
    pub struggling_score: u8,
    pub struggling_multiplier: f64,
    /// Lower bound on the weight used in the key exponent.
    pub min_weight: f64,
}

impl Default for SessionWeights {
    fn default() -> Self {
        Self {
            max_ease: 5.0,
            ease_weight: 10.0,
            interval_cap_days: 30,
            interval_weight: 1.0,
            struggling_score: 1,
            struggling_multiplier: 2.0,
            min_weight: 0.1,
        }
    }
}

impl SchedulerPolicy {
    /// Load and validate a policy from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let policy: SchedulerPolicy = serde_json::from_str(raw)?;
        policy.validate()?;
        tracing::debug!(?policy, "loaded scheduler policy");
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(MIN_SCORE..MAX_SCORE).contains(&self.failure_threshold) {
            return Err(PolicyError::Invalid(format!(
                "failure_threshold must be in {MIN_SCORE}..{MAX_SCORE}, got {}",
                self.failure_threshold
            )));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.neutral_score)
            || self.neutral_score <= self.failure_threshold
        {
            return Err(PolicyError::Invalid(format!(
                "neutral_score must be a passing score, got {}",
                self.neutral_score
            )));
        }
        if !self.ease_floor.is_finite() || self.ease_floor <= 0.0 {
            return Err(PolicyError::Invalid(format!(
                "ease_floor must be positive, got {}",
                self.ease_floor
            )));
        }
        if !self.ease_penalty.is_finite() || self.ease_penalty < 0.0 {
            return Err(PolicyError::Invalid(format!(
                "ease_penalty must be non-negative, got {}",
                self.ease_penalty
            )));
        }
        if !self.ease_bonus_per_level.is_finite() || self.ease_bonus_per_level < 0.0 {
            return Err(PolicyError::Invalid(format!(
                "ease_bonus_per_level must be non-negative, got {}",
                self.ease_bonus_per_level
            )));
        }
        if self.reset_interval_days < 1 {
            return Err(PolicyError::Invalid(format!(
                "reset_interval_days must be at least 1, got {}",
                self.reset_interval_days
            )));
        }
        if !(self.reset_interval_days..=INTERVAL_LIMIT_DAYS).contains(&self.max_interval_days) {
            return Err(PolicyError::Invalid(format!(
                "max_interval_days must be in {}..={INTERVAL_LIMIT_DAYS}, got {}",
                self.reset_interval_days, self.max_interval_days
            )));
        }
        self.session.validate()
    }
}

impl SessionWeights {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let finite = [
            ("max_ease", self.max_ease),
            ("ease_weight", self.ease_weight),
            ("interval_weight", self.interval_weight),
            ("struggling_multiplier", self.struggling_multiplier),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(PolicyError::Invalid(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if !self.min_weight.is_finite() || self.min_weight <= 0.0 {
            return Err(PolicyError::Invalid(format!(
                "min_weight must be positive, got {}",
                self.min_weight
            )));
        }
        if self.interval_cap_days < 0 {
            return Err(PolicyError::Invalid(format!(
                "interval_cap_days must be non-negative, got {}",
                self.interval_cap_days
            )));
        }
        Ok(())
    }
}
