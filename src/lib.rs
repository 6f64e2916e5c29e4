//! # sub-cut
//!
//! A library for measuring protease recognition-site specificity and ranking
//! candidate cleavage sites in target peptides.
//!
//! Each protease is known to cleave a set of recognition sites. Proteases whose
//! sites are highly similar to each other are specific; those are the useful
//! ones when predicting where a new peptide will be cut.
//!
//! `sub-cut` scores every pair of sites within each protease group, averages
//! them, normalizes the averages into [0, 1], and then aligns query peptides
//! against the sites of the most specific proteases.
//!
//! ## Features
//!
//! - **Two scoring strategies**: Smith-Waterman local alignment with affine gaps,
//!   or position-by-position substitution scores
//! - **Balanced parallelism**: Groups are spread across workers by estimated
//!   pair count, then scored on a fixed thread pool
//! - **Explicit exclusions**: Oversized groups, unscoreable groups and
//!   mismatched pairs are reported, never silently dropped
//! - **Ranked tables**: One tab-delimited table of candidate sites per query
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sub_cut::{normalize, plan, PairScorer, ScoringCoordinator, SubstrateCatalog};
//! use sub_cut::core::config::GapCosts;
//! use sub_cut::core::types::Strategy;
//! use sub_cut::matching::matrix::SubstitutionMatrix;
//!
//! let catalog = SubstrateCatalog::from_json(
//!     r#"{"A": ["AAAAAAAA", "AAAAAAAT"], "B": ["CCCCCCCC"], "C": ["AAAA", "AATT"]}"#,
//!     5_000,
//! ).unwrap();
//!
//! let matrix = SubstitutionMatrix::named("BLOSUM62").unwrap();
//! let scorer = PairScorer::new(Strategy::Positional, matrix, GapCosts::default());
//!
//! let partitions = plan(catalog.groups(), 2).unwrap();
//! let run = ScoringCoordinator::new(&scorer).run(&partitions).unwrap();
//! let table = normalize(&run.scores).unwrap();
//!
//! assert_eq!(table.scored["A"], 1.0);
//! assert_eq!(table.scored["C"], 0.0);
//! assert!(table.singleton.contains("B"));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Grouped-sequence table and persisted normalized scores
//! - [`core`]: Core data types and run configuration
//! - [`matching`]: Substitution matrices, pair scoring, aggregation, ranking
//! - [`scheduling`]: Partition planning and the parallel scoring coordinator
//! - [`parsing`]: FASTA query and substitution table readers
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod scheduling;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::scores::{NormalizedScoreTable, SpecificityFilter};
pub use catalog::store::SubstrateCatalog;
pub use core::group::SequenceGroup;
pub use core::query::TargetQuery;
pub use core::types::*;
pub use matching::engine::{RankedAlignment, RankingEngine};
pub use matching::normalize::normalize;
pub use matching::scoring::PairScorer;
pub use scheduling::coordinator::ScoringCoordinator;
pub use scheduling::partition::plan;
