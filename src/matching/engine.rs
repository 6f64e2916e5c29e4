use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::group::SequenceGroup;
use crate::core::query::TargetQuery;
use crate::matching::scoring::{PairScorer, ScoringError, NO_ALIGNMENT_MARKER};

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("query '{query}': {source}")]
    Query { query: String, source: ScoringError },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// One candidate site aligned against a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedAlignment {
    /// Enzyme the candidate site belongs to
    pub group: String,

    pub candidate: String,

    /// Local alignment score, None when no significant alignment exists
    pub score: Option<i32>,

    /// Alignment trace, None when no significant alignment exists
    pub alignment: Option<String>,
}

impl RankedAlignment {
    /// Alignment text, or the fixed marker when there is none
    #[must_use]
    pub fn alignment_or_marker(&self) -> &str {
        self.alignment.as_deref().unwrap_or(NO_ALIGNMENT_MARKER)
    }
}

/// All candidates ranked against one query
#[derive(Debug, Clone)]
pub struct RankedTable {
    pub query: TargetQuery,
    pub rows: Vec<RankedAlignment>,
}

impl RankedTable {
    /// Rows with a defined score
    #[must_use]
    pub fn aligned(&self) -> usize {
        self.rows.iter().filter(|r| r.score.is_some()).count()
    }

    #[must_use]
    pub fn best(&self) -> Option<&RankedAlignment> {
        self.rows.first().filter(|r| r.score.is_some())
    }
}

/// Ranks candidate recognition sites by local alignment against query peptides.
///
/// Always aligns, whatever strategy the scorer was built for, using the
/// scorer's matrix and gap costs.
pub struct RankingEngine<'a> {
    candidates: Vec<&'a SequenceGroup>,
    scorer: &'a PairScorer,
}

impl<'a> RankingEngine<'a> {
    pub fn new(candidates: Vec<&'a SequenceGroup>, scorer: &'a PairScorer) -> Self {
        Self { candidates, scorer }
    }

    /// Number of candidate sites across all groups
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.iter().map(|g| g.len()).sum()
    }

    /// Align the query against every candidate site, best first.
    ///
    /// Rows without a significant alignment sort after all scored rows;
    /// equal scores keep candidate order.
    ///
    /// # Errors
    ///
    /// Returns `RankingError::Query` if the query or a candidate contains a
    /// residue the matrix cannot score.
    pub fn rank(&self, query: &TargetQuery) -> Result<RankedTable, RankingError> {
        let mut rows = Vec::with_capacity(self.candidate_count());

        for group in &self.candidates {
            for candidate in &group.sequences {
                let alignment = self
                    .scorer
                    .align(&query.sequence, candidate)
                    .map_err(|source| RankingError::Query {
                        query: query.id.clone(),
                        source,
                    })?;
                rows.push(RankedAlignment {
                    group: group.id.clone(),
                    candidate: candidate.clone(),
                    score: alignment.as_ref().map(|a| a.score),
                    alignment: alignment.map(|a| a.trace()),
                });
            }
        }

        // Option orders None below Some, so descending puts unscored rows last
        rows.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            "Ranked {} candidates for '{}', {} aligned",
            rows.len(),
            query.id,
            rows.iter().filter(|r| r.score.is_some()).count()
        );

        Ok(RankedTable {
            query: query.clone(),
            rows,
        })
    }

    /// Rank every query on a pool of `worker_count` threads, one task per query.
    ///
    /// Tables are returned in query order.
    ///
    /// # Errors
    ///
    /// Returns the first `RankingError` raised by any query, or a pool error.
    pub fn rank_all(
        &self,
        queries: &[TargetQuery],
        worker_count: usize,
    ) -> Result<Vec<RankedTable>, RankingError> {
        if worker_count == 0 {
            return Err(RankingError::ZeroWorkers);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("sub-cut-rank-{i}"))
            .build()?;

        info!(
            "Ranking {} queries against {} candidate sites from {} groups",
            queries.len(),
            self.candidate_count(),
            self.candidates.len()
        );

        pool.install(|| queries.par_iter().map(|q| self.rank(q)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GapCosts;
    use crate::core::types::Strategy;
    use crate::matching::matrix::SubstitutionMatrix;

    fn scorer() -> PairScorer {
        PairScorer::new(
            Strategy::Alignment,
            SubstitutionMatrix::named("PAM70").unwrap(),
            GapCosts::default(),
        )
    }

    #[test]
    fn test_unaligned_rows_sort_last() {
        let groups = vec![
            SequenceGroup::new("prolyl", ["PPPP"]),
            SequenceGroup::new("tryptophyl", ["WWWW", "WWWWWW"]),
        ];
        let scorer = scorer();
        let engine = RankingEngine::new(groups.iter().collect(), &scorer);
        let query = TargetQuery::new("q|1|x", "WWWWWWWWWW");

        let table = engine.rank(&query).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].candidate, "WWWWWW");
        assert_eq!(table.rows[0].score, Some(6 * 13));
        assert_eq!(table.rows[1].score, Some(4 * 13));

        let last = &table.rows[2];
        assert_eq!(last.group, "prolyl");
        assert_eq!(last.score, None);
        assert_eq!(last.alignment_or_marker(), NO_ALIGNMENT_MARKER);
        assert_eq!(table.aligned(), 2);
        assert_eq!(table.best().unwrap().candidate, "WWWWWW");
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let groups = vec![
            SequenceGroup::new("first", ["DEVD"]),
            SequenceGroup::new("second", ["DEVD"]),
        ];
        let scorer = scorer();
        let engine = RankingEngine::new(groups.iter().collect(), &scorer);
        let table = engine.rank(&TargetQuery::new("q", "GGDEVDGG")).unwrap();
        assert_eq!(table.rows[0].group, "first");
        assert_eq!(table.rows[1].group, "second");
        assert_eq!(table.rows[0].score, table.rows[1].score);
    }

    #[test]
    fn test_rank_all_preserves_query_order() {
        let groups = vec![SequenceGroup::new("caspase", ["DEVDG", "IETDG"])];
        let scorer = scorer();
        let engine = RankingEngine::new(groups.iter().collect(), &scorer);
        let queries: Vec<TargetQuery> = (0..8)
            .map(|i| TargetQuery::new(format!("q{i}"), "MKDEVDGAIETDGK"))
            .collect();

        let tables = engine.rank_all(&queries, 3).unwrap();
        assert_eq!(tables.len(), 8);
        for (i, table) in tables.iter().enumerate() {
            assert_eq!(table.query.id, format!("q{i}"));
            assert_eq!(table.rows.len(), 2);
        }
    }

    #[test]
    fn test_invalid_query_is_reported() {
        let groups = vec![SequenceGroup::new("caspase", ["DEVD"])];
        let scorer = scorer();
        let engine = RankingEngine::new(groups.iter().collect(), &scorer);
        let err = engine.rank(&TargetQuery::new("bad", "DEJVD")).unwrap_err();
        assert!(err.to_string().contains("bad"));

        assert!(matches!(
            engine.rank_all(&[], 0),
            Err(RankingError::ZeroWorkers)
        ));
    }

    #[test]
    fn test_no_candidates() {
        let scorer = scorer();
        let engine = RankingEngine::new(Vec::new(), &scorer);
        let table = engine.rank(&TargetQuery::new("q", "DEVD")).unwrap();
        assert!(table.rows.is_empty());
        assert!(table.best().is_none());
    }
}
