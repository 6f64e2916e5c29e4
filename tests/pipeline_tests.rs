//! End-to-end tests of the scoring and ranking pipeline through the library API.

use std::collections::BTreeMap;

use sub_cut::catalog::scores::SpecificityFilter;
use sub_cut::core::config::{GapCosts, RankingConfig};
use sub_cut::core::group::SequenceGroup;
use sub_cut::core::query::TargetQuery;
use sub_cut::matching::aggregate::GroupAggregator;
use sub_cut::matching::matrix::SubstitutionMatrix;
use sub_cut::matching::normalize::NormalizeError;
use sub_cut::matching::scoring::{ScoringError, NO_ALIGNMENT_MARKER};
use sub_cut::{
    normalize, plan, GroupScore, PairScorer, RankingEngine, ScoringCoordinator, Strategy,
    SubstrateCatalog,
};

fn scorer(strategy: Strategy) -> PairScorer {
    let matrix = SubstitutionMatrix::named(strategy.default_matrix()).unwrap();
    PairScorer::new(strategy, matrix, GapCosts::default())
}

/// Groups with a wide spread of sizes, built from a deterministic pseudo-random walk
fn uneven_groups() -> Vec<SequenceGroup> {
    let residues = b"ACDEFGHIKLMNPQRSTVWY";
    let sizes = [1, 2, 3, 5, 8, 13, 21, 34, 1, 1, 4, 40, 7, 2, 19];
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    sizes
        .iter()
        .enumerate()
        .map(|(g, &size)| {
            let sites: Vec<String> = (0..size)
                .map(|_| {
                    (0..8)
                        .map(|_| {
                            state ^= state << 13;
                            state ^= state >> 7;
                            state ^= state << 17;
                            residues[(state % residues.len() as u64) as usize] as char
                        })
                        .collect()
                })
                .collect();
            SequenceGroup::new(format!("protease-{g:02}"), sites)
        })
        .collect()
}

#[test]
fn test_small_example_positional() {
    let catalog = SubstrateCatalog::from_json(
        r#"{"A": ["AAAAAAAA", "AAAAAAAT"], "B": ["CCCCCCCC"]}"#,
        5_000,
    )
    .unwrap();
    let scorer = scorer(Strategy::Positional);
    let aggregator = GroupAggregator::new(&scorer);

    let a = aggregator.aggregate(catalog.get("A").unwrap()).unwrap();
    assert_eq!(a.pairs_evaluated, 1);
    let b = aggregator.aggregate(catalog.get("B").unwrap()).unwrap();
    assert_eq!(b.score, GroupScore::Singleton);

    let only_a = BTreeMap::from([("A".to_string(), GroupScore::Scored { mean: 0.9 })]);
    assert_eq!(
        normalize(&only_a),
        Err(NormalizeError::DegenerateRange { scored_groups: 1 })
    );
}

#[test]
fn test_positional_length_mismatch_never_scores() {
    let scorer = scorer(Strategy::Positional);
    for (left, right) in [("AAAA", "AAAAA"), ("DEVDGSAK", "DEVD"), ("W", "WW")] {
        assert!(matches!(
            scorer.score(left, right),
            Err(ScoringError::LengthMismatch { .. })
        ));
    }
}

#[test]
fn test_partitions_cover_input_exactly_once() {
    let groups = uneven_groups();
    for workers in [1, 2, 3, 4, 7, 32] {
        let partitions = plan(&groups, workers).unwrap();
        assert_eq!(partitions.len(), workers);

        let mut seen: Vec<&str> = partitions
            .iter()
            .flat_map(|p| p.groups.iter().map(|g| g.id.as_str()))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected, "{workers} workers");
    }
}

#[test]
fn test_plan_is_deterministic() {
    let groups = uneven_groups();
    let first: Vec<Vec<String>> = plan(&groups, 4)
        .unwrap()
        .iter()
        .map(|p| p.stats().groups)
        .collect();
    for _ in 0..5 {
        let again: Vec<Vec<String>> = plan(&groups, 4)
            .unwrap()
            .iter()
            .map(|p| p.stats().groups)
            .collect();
        assert_eq!(again, first);
    }
}

#[test]
fn test_greedy_balance_bound() {
    let groups = uneven_groups();
    let max_cost = groups.iter().map(SequenceGroup::cost_estimate).max().unwrap();
    for workers in [2, 3, 4, 5] {
        let partitions = plan(&groups, workers).unwrap();
        let costs: Vec<u64> = partitions.iter().map(|p| p.total_cost).collect();
        let spread = costs.iter().max().unwrap() - costs.iter().min().unwrap();
        assert!(
            spread <= max_cost,
            "{workers} workers: spread {spread} exceeds largest group cost {max_cost}"
        );
    }
}

#[test]
fn test_size_example_costs() {
    let sized = |id: &str, n: usize| SequenceGroup::new(id, (0..n).map(|i| format!("A{i}")));
    let groups = vec![
        sized("s1", 1),
        sized("s10a", 10),
        sized("s10b", 10),
        sized("s50", 50),
        sized("s200", 200),
    ];
    let costs: Vec<u64> = groups.iter().map(SequenceGroup::cost_estimate).collect();
    assert_eq!(costs, vec![0, 45, 45, 1225, 19900]);

    let partitions = plan(&groups, 2).unwrap();
    let heavy = partitions
        .iter()
        .find(|p| p.groups.iter().any(|g| g.id == "s200"))
        .unwrap();
    let light = partitions.iter().find(|p| p.index != heavy.index).unwrap();
    // The dominant group's partition still holds more work than everything else combined
    assert!(heavy.total_cost > light.total_cost);
    assert_eq!(heavy.total_cost + light.total_cost, 45 + 45 + 1225 + 19900);
}

#[test]
fn test_scores_independent_of_worker_count() {
    let groups = uneven_groups();
    let scorer = scorer(Strategy::Alignment);
    let coordinator = ScoringCoordinator::new(&scorer);

    let baseline = coordinator.run(&plan(&groups, 1).unwrap()).unwrap();
    for workers in [2, 5] {
        let run = coordinator.run(&plan(&groups, workers).unwrap()).unwrap();
        assert_eq!(run.scores, baseline.scores);
        assert_eq!(run.pairs_evaluated, baseline.pairs_evaluated);
    }

    let expected_pairs: u64 = groups.iter().map(SequenceGroup::cost_estimate).sum();
    assert_eq!(baseline.pairs_evaluated, expected_pairs);
}

#[test]
fn test_normalized_range_is_exact() {
    let groups = uneven_groups();
    let scorer = scorer(Strategy::Positional);
    let run = ScoringCoordinator::new(&scorer)
        .run(&plan(&groups, 3).unwrap())
        .unwrap();
    let table = normalize(&run.scores).unwrap();

    let raw: Vec<(&String, f64)> = run
        .scores
        .iter()
        .filter_map(|(id, score)| score.value().map(|v| (id, v)))
        .collect();
    let (min_id, _) = raw
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    let (max_id, _) = raw
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();

    assert_eq!(table.scored[*min_id], 0.0);
    assert_eq!(table.scored[*max_id], 1.0);
    assert!(table.scored.values().all(|v| (0.0..=1.0).contains(v)));

    let singletons: Vec<&String> = run
        .scores
        .iter()
        .filter(|(_, s)| s.is_singleton())
        .map(|(id, _)| id)
        .collect();
    assert_eq!(singletons.len(), 3);
    assert!(singletons.iter().all(|id| table.singleton.contains(*id)));
}

#[test]
fn test_score_filter_and_rank() {
    let catalog = SubstrateCatalog::from_json(
        r#"{
            "caspase-3": ["DEVDGSAK", "DEVDGAAK", "DEVDGSAR"],
            "broad": ["GPLGIAGQ", "WKRYHEFC", "MNTSVDLI"],
            "calpain-1": ["PLFAERKA"],
            "trypsin 1": ["AAAKAAAA"]
        }"#,
        5_000,
    )
    .unwrap();

    let scorer = scorer(Strategy::Alignment);
    let run = ScoringCoordinator::new(&scorer)
        .run(&plan(catalog.groups(), 2).unwrap())
        .unwrap();
    let table = normalize(&run.scores).unwrap();
    assert_eq!(table.scored["caspase-3"], 1.0);
    assert_eq!(table.scored["broad"], 0.0);

    let filter = SpecificityFilter::from(&RankingConfig {
        denylist: vec!["trypsin 1".to_string()],
        ..RankingConfig::default()
    });
    let (candidates, summary) = filter.select(&catalog, &table);
    let ids: Vec<&str> = candidates.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["calpain-1", "caspase-3"]);
    assert_eq!(summary.below_threshold, vec!["broad"]);
    assert_eq!(summary.denylisted, vec!["trypsin 1"]);

    let engine = RankingEngine::new(candidates, &scorer);
    let queries = vec![
        TargetQuery::new("pep1|A|x", "MKTAYDEVDGSAKQW"),
        TargetQuery::new("pep2|B|y", "WWWWWWWWWW"),
    ];
    let tables = engine.rank_all(&queries, 2).unwrap();
    assert_eq!(tables.len(), 2);

    let best = tables[0].best().unwrap();
    assert_eq!(best.group, "caspase-3");
    assert_eq!(best.candidate, "DEVDGSAK");

    // Rows are sorted best first, unscored rows last
    for table in &tables {
        let first_unscored = table
            .rows
            .iter()
            .position(|r| r.score.is_none())
            .unwrap_or(table.rows.len());
        assert!(table.rows[first_unscored..].iter().all(|r| r.score.is_none()));
        assert!(table.rows[first_unscored..]
            .iter()
            .all(|r| r.alignment_or_marker() == NO_ALIGNMENT_MARKER));
        let scores: Vec<i32> = table.rows[..first_unscored]
            .iter()
            .filter_map(|r| r.score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
