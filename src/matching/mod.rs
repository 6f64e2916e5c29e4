//! Pairwise scoring, group aggregation, normalization and target ranking.
//!
//! - [`PairScorer`]: Scores one pair of sequences under a [`Strategy`]
//! - [`GroupAggregator`]: Mean pairwise score within one enzyme's sites
//! - [`normalize`]: Min-max normalization of group scores into [0, 1]
//! - [`RankingEngine`]: Ranks candidate sites against query peptides
//!
//! ## Strategies
//!
//! - **Alignment**: Smith-Waterman local alignment with affine gaps. The first
//!   gap residue scores `open`, each further one `extend`. A best score of
//!   zero or less means no significant alignment.
//! - **Positional**: Sum of substitution scores position by position, divided
//!   by the motif width. Both sequences must have the same width.
//!
//! ## Example
//!
//! ```rust
//! use sub_cut::core::config::GapCosts;
//! use sub_cut::core::types::Strategy;
//! use sub_cut::matching::matrix::SubstitutionMatrix;
//! use sub_cut::matching::scoring::PairScorer;
//!
//! let matrix = SubstitutionMatrix::named("BLOSUM62").unwrap();
//! let scorer = PairScorer::new(Strategy::Positional, matrix, GapCosts::default());
//!
//! let score = scorer.score("AAAAAAAA", "AAAAAAAT").unwrap();
//! assert_eq!(score, Some(3.5));
//! ```
//!
//! [`PairScorer`]: scoring::PairScorer
//! [`Strategy`]: crate::core::types::Strategy
//! [`GroupAggregator`]: aggregate::GroupAggregator
//! [`normalize`]: normalize::normalize
//! [`RankingEngine`]: engine::RankingEngine

pub mod aggregate;
pub mod engine;
pub mod matrix;
pub mod normalize;
pub mod scoring;
