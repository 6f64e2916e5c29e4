//! Command-line interface for sub-cut.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **score**: Score every protease group and write normalized group scores
//! - **plan**: Show how groups would be partitioned across workers
//! - **rank**: Rank candidate recognition sites against query peptides
//! - **compare**: Score two sequences against each other
//!
//! ## Usage
//!
//! ```text
//! # Score groups with local alignment on 8 workers
//! sub-cut score --groups substrates.json --output scores.json --workers 8
//!
//! # Positional scoring under BLOSUM62
//! sub-cut score --groups substrates.json --output scores.json --strategy positional
//!
//! # Rank the most specific proteases against target peptides
//! sub-cut rank --groups substrates.json --scores scores.json \
//!     --queries targets.fasta --out-dir results --threshold 0.6
//!
//! # JSON output for scripting
//! sub-cut --format json compare DEVDGSAK DQTDGSAK
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::{GapCosts, DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};
use crate::core::types::Strategy;
use crate::matching::matrix::SubstitutionMatrix;
use crate::matching::scoring::PairScorer;
use crate::parsing::matrix::parse_matrix_file;

pub mod compare;
pub mod plan;
pub mod rank;
pub mod score;

#[derive(Parser)]
#[command(name = "sub-cut")]
#[command(version)]
#[command(about = "Score protease recognition-site specificity and rank cleavage candidates")]
#[command(
    long_about = "sub-cut measures how conserved each protease's recognition sites are and uses the most specific proteases to find likely cleavage sites in target peptides.\n\nIt provides:\n- Workload-balanced parallel scoring of every protease group\n- Min-max normalized group scores, with single-site groups kept apart\n- Per-peptide ranked tables of candidate sites by local alignment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every group and write normalized scores
    Score(score::ScoreArgs),

    /// Show the partition plan for a group table
    Plan(plan::PlanArgs),

    /// Rank candidate sites against query peptides
    Rank(rank::RankArgs),

    /// Score two sequences against each other
    Compare(compare::CompareArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Substitution matrix and gap cost options shared by the scoring commands
#[derive(clap::Args, Debug, Clone)]
pub struct MatrixArgs {
    /// Named substitution matrix (BLOSUM45, BLOSUM62, PAM70, PAM250)
    #[arg(long, conflicts_with = "matrix_file")]
    pub matrix: Option<String>,

    /// Custom substitution table (CSV, or TSV by extension)
    #[arg(long, value_name = "FILE")]
    pub matrix_file: Option<PathBuf>,

    /// Score of the first residue of a gap (alignment only)
    #[arg(long, default_value_t = DEFAULT_GAP_OPEN, allow_negative_numbers = true)]
    pub gap_open: i32,

    /// Score of each further gap residue (alignment only)
    #[arg(long, default_value_t = DEFAULT_GAP_EXTEND, allow_negative_numbers = true)]
    pub gap_extend: i32,
}

impl MatrixArgs {
    #[must_use]
    pub fn gap_costs(&self) -> GapCosts {
        GapCosts {
            open: self.gap_open,
            extend: self.gap_extend,
        }
    }

    /// Load the selected matrix, falling back to the strategy default
    pub fn load(&self, strategy: Strategy) -> anyhow::Result<SubstitutionMatrix> {
        if let Some(path) = &self.matrix_file {
            return parse_matrix_file(path)
                .with_context(|| format!("Failed to load substitution table {}", path.display()));
        }
        let name = self
            .matrix
            .as_deref()
            .unwrap_or_else(|| strategy.default_matrix());
        Ok(SubstitutionMatrix::named(name)?)
    }

    /// Build a validated scorer for the strategy
    pub fn build_scorer(&self, strategy: Strategy) -> anyhow::Result<PairScorer> {
        let gaps = self.gap_costs();
        if strategy == Strategy::Alignment {
            gaps.validate()?;
        }
        let matrix = self.load(strategy)?;
        debug!(
            "Using {strategy} scoring with {} (gap open {}, extend {})",
            matrix.name(),
            gaps.open,
            gaps.extend
        );
        Ok(PairScorer::new(strategy, matrix, gaps))
    }
}
