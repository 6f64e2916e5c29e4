use serde::{Deserialize, Serialize};

/// A group dropped at load time for exceeding the size ceiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversizedGroup {
    pub group: String,
    pub size: usize,
}

/// Why a pair was left out of its group's mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PairExclusion {
    /// Positional scoring of sequences with different widths
    LengthMismatch { left_len: usize, right_len: usize },
}

/// A pair excluded from scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedPair {
    pub group: String,
    pub left: String,
    pub right: String,
    #[serde(flatten)]
    pub exclusion: PairExclusion,
}

/// Pairs of one group that produced no significant alignment.
///
/// Those pairs are left out of the group mean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefinedPairs {
    pub group: String,
    /// Pairs without a defined score
    pub undefined: u64,
    /// All pairs visited in the group
    pub evaluated: u64,
}

/// Everything left out of a run, so no exclusion is silent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSummary {
    /// Groups dropped for reaching the size ceiling
    pub oversized_groups: Vec<OversizedGroup>,

    /// Groups where no pair produced a defined score
    pub degenerate_groups: Vec<String>,

    /// Individual pairs excluded from group means
    pub excluded_pairs: Vec<ExcludedPair>,

    /// Per-group counts of pairs with no significant alignment
    #[serde(default)]
    pub undefined_pairs: Vec<UndefinedPairs>,
}

impl ExclusionSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.oversized_groups.is_empty()
            && self.degenerate_groups.is_empty()
            && self.excluded_pairs.is_empty()
            && self.undefined_pairs.is_empty()
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: ExclusionSummary) {
        self.oversized_groups.extend(other.oversized_groups);
        self.degenerate_groups.extend(other.degenerate_groups);
        self.excluded_pairs.extend(other.excluded_pairs);
        self.undefined_pairs.extend(other.undefined_pairs);
    }

    /// Total pairs without a defined score, across groups
    #[must_use]
    pub fn undefined_pair_count(&self) -> u64 {
        self.undefined_pairs.iter().map(|u| u.undefined).sum()
    }
}
