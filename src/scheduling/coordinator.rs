use std::collections::BTreeMap;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::summary::{ExclusionSummary, UndefinedPairs};
use crate::core::types::GroupScore;
use crate::matching::aggregate::{AggregateError, GroupAggregator};
use crate::matching::scoring::PairScorer;
use crate::scheduling::partition::Partition;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("partition {partition} failed: {source}")]
    Group {
        partition: usize,
        source: AggregateError,
    },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Merged outcome of a scoring run
#[derive(Debug, Clone, Default)]
pub struct ScoringRun {
    /// Score of every group, keyed by group id
    pub scores: BTreeMap<String, GroupScore>,

    /// Degenerate groups and excluded pairs found while scoring
    pub summary: ExclusionSummary,

    pub pairs_evaluated: u64,
}

/// What one worker hands back for its partition
#[derive(Debug, Default)]
struct PartitionResult {
    scores: Vec<(String, GroupScore)>,
    summary: ExclusionSummary,
    pairs_evaluated: u64,
}

/// Scores partitions on a fixed pool with one task per partition.
///
/// Workers share only the read-only scorer. Each returns its own flat result,
/// merged after every worker has finished. Fail-stop: the first group that
/// cannot be scored aborts the run.
///
/// There is no cancellation; a run always executes to completion or failure.
#[derive(Debug, Clone, Copy)]
pub struct ScoringCoordinator<'a> {
    scorer: &'a PairScorer,
}

impl<'a> ScoringCoordinator<'a> {
    pub fn new(scorer: &'a PairScorer) -> Self {
        Self { scorer }
    }

    /// Score every group in every partition and merge the results.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatorError::Group` naming the partition and group of the
    /// first unrecoverable scoring failure, or `CoordinatorError::ThreadPool`
    /// if the worker pool cannot be created.
    pub fn run(&self, partitions: &[Partition<'_>]) -> Result<ScoringRun, CoordinatorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(partitions.len().max(1))
            .thread_name(|i| format!("sub-cut-worker-{i}"))
            .build()?;

        info!(
            "Scoring {} groups across {} partitions ({} strategy, {})",
            partitions.iter().map(|p| p.groups.len()).sum::<usize>(),
            partitions.len(),
            self.scorer.strategy(),
            self.scorer.matrix().name()
        );

        // collect() returns only once every task is done
        let results: Vec<PartitionResult> = pool.install(|| {
            partitions
                .par_iter()
                .map(|partition| self.score_partition(partition))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut run = ScoringRun::default();
        for result in results {
            run.scores.extend(result.scores);
            run.summary.merge(result.summary);
            run.pairs_evaluated += result.pairs_evaluated;
        }
        run.summary.degenerate_groups.sort();
        run.summary
            .undefined_pairs
            .sort_by(|a, b| a.group.cmp(&b.group));

        Ok(run)
    }

    fn score_partition(&self, partition: &Partition<'_>) -> Result<PartitionResult, CoordinatorError> {
        let aggregator = GroupAggregator::new(self.scorer);
        let mut result = PartitionResult::default();

        for group in &partition.groups {
            debug!(
                "Worker {}: scoring '{}' ({} sequences)",
                partition.index,
                group.id,
                group.len()
            );

            let report = aggregator
                .aggregate(group)
                .map_err(|source| CoordinatorError::Group {
                    partition: partition.index,
                    source,
                })?;

            if report.score.is_degenerate() {
                warn!("Group '{}' has no measurable similarity", report.group);
                result.summary.degenerate_groups.push(report.group.clone());
            }
            if report.pairs_undefined > 0 {
                debug!(
                    "Group '{}': {} of {} pairs had no significant alignment",
                    report.group, report.pairs_undefined, report.pairs_evaluated
                );
                result.summary.undefined_pairs.push(UndefinedPairs {
                    group: report.group.clone(),
                    undefined: report.pairs_undefined,
                    evaluated: report.pairs_evaluated,
                });
            }
            result.pairs_evaluated += report.pairs_evaluated;
            result.summary.excluded_pairs.extend(report.excluded_pairs);
            result.scores.push((report.group, report.score));
        }

        if !partition.is_empty() {
            info!(
                "Partition {} done: {} groups, {} pairs",
                partition.index,
                partition.groups.len(),
                result.pairs_evaluated
            );
        }

        Ok(result)
    }
}
