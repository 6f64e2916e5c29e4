use thiserror::Error;
use tracing::warn;

use crate::core::group::SequenceGroup;
use crate::core::summary::{ExcludedPair, PairExclusion};
use crate::core::types::GroupScore;
use crate::matching::scoring::{PairScorer, ScoringError};

/// A scoring failure inside one group, fatal for the run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("group '{group}': {source}")]
pub struct AggregateError {
    pub group: String,
    pub source: ScoringError,
}

/// Outcome of scoring every pair in one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub group: String,

    pub score: GroupScore,

    /// Unordered pairs visited, always n·(n−1)/2
    pub pairs_evaluated: u64,

    /// Pairs that produced no defined score (no significant alignment)
    pub pairs_undefined: u64,

    /// Pairs excluded from the mean, e.g. motifs of different widths
    pub excluded_pairs: Vec<ExcludedPair>,
}

impl GroupReport {
    /// Pairs that contributed to the mean
    #[must_use]
    pub fn pairs_scored(&self) -> u64 {
        self.pairs_evaluated - self.pairs_undefined - self.excluded_pairs.len() as u64
    }
}

/// Reduces all pairwise scores within a group to their arithmetic mean
#[derive(Debug, Clone, Copy)]
pub struct GroupAggregator<'a> {
    scorer: &'a PairScorer,
}

impl<'a> GroupAggregator<'a> {
    pub fn new(scorer: &'a PairScorer) -> Self {
        Self { scorer }
    }

    /// Score every unordered pair of distinct members and average the defined scores.
    ///
    /// A single-member group is `Singleton`; a group where no pair produced a
    /// defined score is `Degenerate`, never a mean over nothing.
    ///
    /// # Errors
    ///
    /// Returns an `AggregateError` naming the group if a pair cannot be scored
    /// for any reason other than a length mismatch.
    pub fn aggregate(&self, group: &SequenceGroup) -> Result<GroupReport, AggregateError> {
        let mut report = GroupReport {
            group: group.id.clone(),
            score: GroupScore::Degenerate,
            pairs_evaluated: 0,
            pairs_undefined: 0,
            excluded_pairs: Vec::new(),
        };

        if group.is_singleton() {
            report.score = GroupScore::Singleton;
            return Ok(report);
        }

        let mut total = 0.0;
        let mut scored = 0u64;

        for (i, left) in group.sequences.iter().enumerate() {
            for right in &group.sequences[i + 1..] {
                report.pairs_evaluated += 1;
                match self.scorer.score(left, right) {
                    Ok(Some(score)) => {
                        total += score;
                        scored += 1;
                    }
                    Ok(None) => report.pairs_undefined += 1,
                    Err(ScoringError::LengthMismatch { left: l, right: r }) => {
                        warn!(
                            "Excluding pair {left}/{right} in '{}': lengths {l} and {r} differ",
                            group.id
                        );
                        report.excluded_pairs.push(ExcludedPair {
                            group: group.id.clone(),
                            left: left.clone(),
                            right: right.clone(),
                            exclusion: PairExclusion::LengthMismatch {
                                left_len: l,
                                right_len: r,
                            },
                        });
                    }
                    Err(source) => {
                        return Err(AggregateError {
                            group: group.id.clone(),
                            source,
                        });
                    }
                }
            }
        }

        if scored > 0 {
            #[allow(clippy::cast_precision_loss)] // pair counts stay far below 2^52
            let mean = total / scored as f64;
            report.score = GroupScore::Scored { mean };
        } else {
            warn!(
                "Group '{}' has no measurable similarity: none of {} pairs scored",
                group.id, report.pairs_evaluated
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GapCosts;
    use crate::core::types::Strategy;
    use crate::matching::matrix::SubstitutionMatrix;

    fn scorer(strategy: Strategy) -> PairScorer {
        let matrix = SubstitutionMatrix::named(strategy.default_matrix()).unwrap();
        PairScorer::new(strategy, matrix, GapCosts::default())
    }

    #[test]
    fn test_singleton_is_undefined() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        let report = aggregator
            .aggregate(&SequenceGroup::new("B", ["CCCCCCCC"]))
            .unwrap();
        assert_eq!(report.score, GroupScore::Singleton);
        assert_eq!(report.pairs_evaluated, 0);
    }

    #[test]
    fn test_two_members_one_pair() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        let report = aggregator
            .aggregate(&SequenceGroup::new("A", ["AAAAAAAA", "AAAAAAAT"]))
            .unwrap();
        assert_eq!(report.pairs_evaluated, 1);
        assert_eq!(report.score, GroupScore::Scored { mean: 3.5 });
    }

    #[test]
    fn test_pair_count_is_n_choose_2() {
        let scorer = scorer(Strategy::Alignment);
        let aggregator = GroupAggregator::new(&scorer);
        let sequences = [
            "DEVDGSAK", "DEVDAAAK", "DQTDGSAK", "IETDSGVK", "LEHDGAAA", "WEHDAAKA", "VEIDGSAK",
        ];
        let report = aggregator
            .aggregate(&SequenceGroup::new("caspase", sequences))
            .unwrap();
        assert_eq!(report.pairs_evaluated, 21);
        assert!(report.score.value().is_some());
    }

    #[test]
    fn test_mean_of_positional_scores() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        // A/A = 4, A/T = 0, T/T = 5 in BLOSUM62
        // AAAA/AAAT = 12/4 = 3, AAAA/AATT = 8/4 = 2, AAAT/AATT = (4+4+0+5)/4 = 3.25
        let report = aggregator
            .aggregate(&SequenceGroup::new("g", ["AAAA", "AAAT", "AATT"]))
            .unwrap();
        let mean = report.score.value().unwrap();
        assert!((mean - (3.0 + 2.0 + 3.25) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_excluded_not_zero() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        let report = aggregator
            .aggregate(&SequenceGroup::new("g", ["AAAA", "AAAA*", "AAAT"]))
            .unwrap();
        assert_eq!(report.pairs_evaluated, 3);
        assert_eq!(report.excluded_pairs.len(), 2);
        assert_eq!(report.pairs_scored(), 1);
        // Only AAAA/AAAT contributes; a zero for each excluded pair would drag it to 1.0
        assert_eq!(report.score, GroupScore::Scored { mean: 3.0 });
    }

    #[test]
    fn test_all_pairs_undefined_is_degenerate() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        let report = aggregator
            .aggregate(&SequenceGroup::new("g", ["AAAA", "AAAAA", "AAAAAA"]))
            .unwrap();
        assert_eq!(report.score, GroupScore::Degenerate);
        assert_eq!(report.excluded_pairs.len(), 3);

        let scorer = self::scorer(Strategy::Alignment);
        let aggregator = GroupAggregator::new(&scorer);
        let report = aggregator
            .aggregate(&SequenceGroup::new("h", ["WWWW", "PPPP"]))
            .unwrap();
        assert_eq!(report.score, GroupScore::Degenerate);
        assert_eq!(report.pairs_undefined, 1);
    }

    #[test]
    fn test_unknown_residue_names_group() {
        let scorer = scorer(Strategy::Positional);
        let aggregator = GroupAggregator::new(&scorer);
        let err = aggregator
            .aggregate(&SequenceGroup::new("broken", ["AAAA", "AAJA"]))
            .unwrap_err();
        assert_eq!(err.group, "broken");
        assert!(err.to_string().contains("broken"));
    }
}
