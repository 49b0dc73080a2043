use serde::{Deserialize, Serialize};

use crate::constants::engine::{DEFAULT_K_MAX, DEFAULT_K_MIN, DEFAULT_RATIO, DEFAULT_SEED};
use crate::errors::NegativeError;
use crate::types::RuleId;

/// Inclusive per-item bounds on attempted perturbations. Each item draws
/// `k ~ Uniform(k_min, k_max)` as its attempt quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRange {
    /// Lower bound, at least 1.
    pub k_min: u32,
    /// Upper bound, at least `k_min`.
    pub k_max: u32,
}

impl Default for QuotaRange {
    fn default() -> Self {
        Self {
            k_min: DEFAULT_K_MIN,
            k_max: DEFAULT_K_MAX,
        }
    }
}

impl QuotaRange {
    /// Build a quota range; validation happens at run start.
    pub fn new(k_min: u32, k_max: u32) -> Self {
        Self { k_min, k_max }
    }

    /// Check that both bounds are positive and ordered.
    pub fn validate(&self) -> Result<(), NegativeError> {
        if self.k_min == 0 || self.k_max == 0 || self.k_min > self.k_max {
            return Err(NegativeError::InvalidQuotaRange {
                k_min: self.k_min,
                k_max: self.k_max,
            });
        }
        Ok(())
    }
}

/// Sampling engine configuration. Values only; loading these from a file is
/// a collaborator concern, hence the serde derives.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed fixing the corpus permutation, quota draws, and per-record
    /// rule-selection order.
    pub seed: u64,
    /// Global negative-to-positive ratio in `(0, 1]`; the emitted row count
    /// is capped at `round(ratio * |positives|)`.
    pub ratio: f64,
    /// Per-item attempt quota bounds.
    pub quota: QuotaRange,
    /// Rule subset to run; empty means every registered rule.
    pub enabled_rules: Vec<RuleId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            ratio: DEFAULT_RATIO,
            quota: QuotaRange::default(),
            enabled_rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Validate ratio and quota. Called before any sampling begins so a bad
    /// configuration never produces partial output.
    pub fn validate(&self) -> Result<(), NegativeError> {
        if !(self.ratio > 0.0 && self.ratio <= 1.0) {
            return Err(NegativeError::InvalidRatio { ratio: self.ratio });
        }
        self.quota.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn ratio_bounds_are_enforced() {
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            let config = EngineConfig {
                ratio,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(NegativeError::InvalidRatio { .. })
            ));
        }
        let full = EngineConfig {
            ratio: 1.0,
            ..EngineConfig::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn quota_bounds_are_enforced() {
        assert!(QuotaRange::new(2, 1).validate().is_err());
        assert!(QuotaRange::new(0, 3).validate().is_err());
        assert!(QuotaRange::new(1, 1).validate().is_ok());
    }
}
