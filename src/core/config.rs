//! Immutable run configuration shared read-only by every worker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Strategy;
use crate::utils::validation::DEFAULT_GROUP_SIZE_CEILING;

/// Default specificity threshold: keeps roughly the top 40% of scored groups
pub const DEFAULT_SPECIFICITY_THRESHOLD: f64 = 0.6;

/// Default gap costs, heavily biased against gaps within recognition sites
pub const DEFAULT_GAP_OPEN: i32 = -10;
pub const DEFAULT_GAP_EXTEND: i32 = -5;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("group size ceiling must be at least 1")]
    ZeroCeiling,

    #[error("gap costs must both be negative (open {open}, extend {extend})")]
    NonNegativeGapCost { open: i32, extend: i32 },

    #[error("gap open cost {open} must be larger in magnitude than gap extend cost {extend}")]
    GapOpenNotDominant { open: i32, extend: i32 },

    #[error("specificity threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),
}

/// Number of workers used when none is configured: half of the available cores
#[must_use]
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

/// Affine gap costs for the alignment strategy.
///
/// The first residue of a gap scores `open`, each further residue scores `extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapCosts {
    pub open: i32,
    pub extend: i32,
}

impl Default for GapCosts {
    fn default() -> Self {
        Self {
            open: DEFAULT_GAP_OPEN,
            extend: DEFAULT_GAP_EXTEND,
        }
    }
}

impl GapCosts {
    /// Validate gap costs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonNegativeGapCost` if either cost is `>= 0`, or
    /// `ConfigError::GapOpenNotDominant` if `|open| <= |extend|`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.open >= 0 || self.extend >= 0 {
            return Err(ConfigError::NonNegativeGapCost {
                open: self.open,
                extend: self.extend,
            });
        }
        if self.open >= self.extend {
            // Both negative here, so open must be strictly below extend
            return Err(ConfigError::GapOpenNotDominant {
                open: self.open,
                extend: self.extend,
            });
        }
        Ok(())
    }
}

/// Configuration for the similarity-scoring phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Pairwise scoring strategy
    pub strategy: Strategy,
    /// Substitution matrix name; the strategy's default when unset
    pub matrix: Option<String>,
    /// Gap costs, used by the alignment strategy only
    pub gap_costs: GapCosts,
    /// Number of parallel workers (and partitions)
    pub worker_count: usize,
    /// Groups with this many distinct sequences or more are dropped
    pub group_size_ceiling: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            matrix: None,
            gap_costs: GapCosts::default(),
            worker_count: default_worker_count(),
            group_size_ceiling: DEFAULT_GROUP_SIZE_CEILING,
        }
    }
}

impl ScoringConfig {
    /// Matrix name to load, falling back to the strategy default
    #[must_use]
    pub fn matrix_name(&self) -> &str {
        self.matrix
            .as_deref()
            .unwrap_or_else(|| self.strategy.default_matrix())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.group_size_ceiling == 0 {
            return Err(ConfigError::ZeroCeiling);
        }
        if self.strategy == Strategy::Alignment {
            self.gap_costs.validate()?;
        }
        Ok(())
    }
}

/// Configuration for the target-ranking phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Minimum normalized score for a scored group to be a candidate
    pub specificity_threshold: f64,
    /// Singleton groups are treated as maximally specific when set
    pub include_singletons: bool,
    /// Groups never used as candidates
    pub denylist: Vec<String>,
    /// Number of queries ranked concurrently
    pub worker_count: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            specificity_threshold: DEFAULT_SPECIFICITY_THRESHOLD,
            include_singletons: true,
            denylist: Vec::new(),
            worker_count: default_worker_count(),
        }
    }
}

impl RankingConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if !(0.0..=1.0).contains(&self.specificity_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.specificity_threshold));
        }
        Ok(())
    }
}
