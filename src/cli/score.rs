use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::catalog::scores::NormalizedScoreTable;
use crate::catalog::store::SubstrateCatalog;
use crate::cli::{MatrixArgs, OutputFormat};
use crate::core::config::{default_worker_count, ScoringConfig};
use crate::core::summary::ExclusionSummary;
use crate::core::types::Strategy;
use crate::matching::normalize::normalize;
use crate::scheduling::coordinator::{ScoringCoordinator, ScoringRun};
use crate::scheduling::partition::plan;
use crate::utils::validation::DEFAULT_GROUP_SIZE_CEILING;

#[derive(Args)]
pub struct ScoreArgs {
    /// Grouped-sequence table (JSON object of group -> sequences)
    #[arg(long, required = true)]
    pub groups: PathBuf,

    /// Where to write the normalized score table
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Pairwise scoring strategy
    #[arg(long, value_enum, default_value = "alignment")]
    pub strategy: Strategy,

    /// Number of parallel workers (default: half the available cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Drop groups with this many distinct sequences or more
    #[arg(long, default_value_t = DEFAULT_GROUP_SIZE_CEILING)]
    pub ceiling: usize,

    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Also write the exclusion summary as JSON
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,
}

impl ScoreArgs {
    fn config(&self) -> ScoringConfig {
        ScoringConfig {
            strategy: self.strategy,
            matrix: self.matrix.matrix.clone().or_else(|| {
                self.matrix
                    .matrix_file
                    .as_ref()
                    .map(|p| p.display().to_string())
            }),
            gap_costs: self.matrix.gap_costs(),
            worker_count: self.workers.unwrap_or_else(default_worker_count),
            group_size_ceiling: self.ceiling,
        }
    }
}

pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.config();
    config.validate()?;

    let catalog = SubstrateCatalog::load_from_file(&args.groups, config.group_size_ceiling)
        .with_context(|| format!("Failed to load groups from {}", args.groups.display()))?;
    if catalog.is_empty() {
        anyhow::bail!("No groups left to score in {}", args.groups.display());
    }

    if verbose {
        eprintln!(
            "Loaded {} groups ({} distinct sequences), {} over the size ceiling",
            catalog.len(),
            catalog.sequence_count(),
            catalog.oversized().len()
        );
    }

    let scorer = args.matrix.build_scorer(config.strategy)?;
    let partitions = plan(catalog.groups(), config.worker_count)?;
    let run = ScoringCoordinator::new(&scorer).run(&partitions)?;

    let mut summary = ExclusionSummary {
        oversized_groups: catalog.oversized().to_vec(),
        ..ExclusionSummary::default()
    };
    summary.merge(run.summary.clone());

    // Written before normalization so exclusions survive a degenerate range
    if let Some(path) = &args.summary {
        std::fs::write(path, serde_json::to_string_pretty(&summary)? + "\n")
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }

    let table = normalize(&run.scores)?;
    table
        .save(&args.output)
        .with_context(|| format!("Failed to write scores to {}", args.output.display()))?;
    info!("Wrote {} group scores to {}", table.scored.len(), args.output.display());

    match format {
        OutputFormat::Text => print_text_results(&args, &config, &run, &table, &summary),
        OutputFormat::Json => print_json_results(&args, &config, &run, &table, &summary)?,
        OutputFormat::Tsv => print_tsv_results(&table),
    }

    Ok(())
}

fn print_text_results(
    args: &ScoreArgs,
    config: &ScoringConfig,
    run: &ScoringRun,
    table: &NormalizedScoreTable,
    summary: &ExclusionSummary,
) {
    println!("Scoring Results");
    println!("{}", "=".repeat(60));
    println!("\nStrategy: {} ({})", config.strategy, config.matrix_name());
    println!("Workers: {}", config.worker_count);
    println!("Pairs evaluated: {}", run.pairs_evaluated);

    println!("\nGroups:");
    println!("  Scored: {}", table.scored.len());
    println!("  Singleton: {}", table.singleton.len());
    println!("  No measurable similarity: {}", summary.degenerate_groups.len());
    println!("  Over size ceiling: {}", summary.oversized_groups.len());
    println!("  Excluded pairs: {}", summary.excluded_pairs.len());
    println!("  Pairs without alignment: {}", summary.undefined_pair_count());

    if !summary.oversized_groups.is_empty() {
        println!("\nDropped (size ceiling {}):", config.group_size_ceiling);
        for oversized in &summary.oversized_groups {
            println!("  {} ({} sequences)", oversized.group, oversized.size);
        }
    }
    if !summary.undefined_pairs.is_empty() {
        println!("\nPairs without a significant alignment:");
        for undefined in &summary.undefined_pairs {
            println!(
                "  {} ({} of {} pairs)",
                undefined.group, undefined.undefined, undefined.evaluated
            );
        }
    }
    if !summary.degenerate_groups.is_empty() {
        println!("\nNo measurable similarity:");
        for group in &summary.degenerate_groups {
            println!("  {group}");
        }
    }

    println!("\nScores written to {}", args.output.display());
}

fn print_json_results(
    args: &ScoreArgs,
    config: &ScoringConfig,
    run: &ScoringRun,
    table: &NormalizedScoreTable,
    summary: &ExclusionSummary,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "config": config,
        "output": args.output.display().to_string(),
        "pairs_evaluated": run.pairs_evaluated,
        "scored": table.scored,
        "singleton": table.singleton,
        "exclusions": summary,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(table: &NormalizedScoreTable) {
    println!("group\tstate\tnormalized_score");
    for (group, value) in &table.scored {
        println!("{group}\tscored\t{value:.6}");
    }
    for group in &table.singleton {
        println!("{group}\tsingleton\t");
    }
}
