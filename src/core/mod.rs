//! Core data types for protease specificity scoring.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`SequenceGroup`]: An enzyme and the distinct recognition sites it cleaves
//! - [`TargetQuery`]: A query peptide to rank candidate sites against
//! - [`Strategy`], [`GroupScore`]: Scoring strategy and per-group outcome
//! - [`ScoringConfig`], [`RankingConfig`], [`GapCosts`]: Immutable run configuration
//! - [`ExclusionSummary`]: Everything a run left out, and why
//!
//! ## Recognition sites
//!
//! Sites are usually fixed-width windows around the cleavage point, written
//! with one-letter residue codes:
//!
//! | P4 | P3 | P2 | P1 | P1' | P2' | P3' | P4' |
//! |----|----|----|----|-----|-----|-----|-----|
//! | D  | E  | V  | D  | G   | S   | A   | K   |
//!
//! `X` stands for an unknown residue and `*` for a gap or non-standard residue.
//!
//! [`SequenceGroup`]: group::SequenceGroup
//! [`TargetQuery`]: query::TargetQuery
//! [`Strategy`]: types::Strategy
//! [`GroupScore`]: types::GroupScore
//! [`ScoringConfig`]: config::ScoringConfig
//! [`RankingConfig`]: config::RankingConfig
//! [`GapCosts`]: config::GapCosts
//! [`ExclusionSummary`]: summary::ExclusionSummary

pub mod config;
pub mod group;
pub mod query;
pub mod summary;
pub mod types;
