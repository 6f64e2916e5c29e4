use clap::Args;

use crate::cli::{MatrixArgs, OutputFormat};
use crate::core::types::Strategy;
use crate::matching::scoring::{LocalAlignment, PairScorer, NO_ALIGNMENT_MARKER};
use crate::utils::validation::normalize_sequence;

#[derive(Args)]
pub struct CompareArgs {
    /// First sequence (the query when aligning)
    #[arg(required = true)]
    pub seq_a: String,

    /// Second sequence
    #[arg(required = true)]
    pub seq_b: String,

    /// Pairwise scoring strategy
    #[arg(long, value_enum, default_value = "alignment")]
    pub strategy: Strategy,

    #[command(flatten)]
    pub matrix: MatrixArgs,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let seq_a = normalize_sequence(&args.seq_a)
        .ok_or_else(|| anyhow::anyhow!("Invalid sequence '{}'", args.seq_a))?;
    let seq_b = normalize_sequence(&args.seq_b)
        .ok_or_else(|| anyhow::anyhow!("Invalid sequence '{}'", args.seq_b))?;

    let scorer = args.matrix.build_scorer(args.strategy)?;

    if verbose {
        eprintln!(
            "Comparing {} ({} residues) with {} ({} residues)",
            seq_a,
            seq_a.len(),
            seq_b,
            seq_b.len()
        );
    }

    let score = scorer.score(&seq_a, &seq_b)?;
    let alignment = match args.strategy {
        Strategy::Alignment => scorer.align(&seq_a, &seq_b)?,
        Strategy::Positional => None,
    };

    match format {
        OutputFormat::Text => print_text_comparison(&scorer, score, alignment.as_ref()),
        OutputFormat::Json => {
            print_json_comparison(&scorer, &seq_a, &seq_b, score, alignment.as_ref())?;
        }
        OutputFormat::Tsv => {
            println!("strategy\tmatrix\tscore");
            println!(
                "{}\t{}\t{}",
                scorer.strategy(),
                scorer.matrix().name(),
                score.map(|s| s.to_string()).unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn print_text_comparison(
    scorer: &PairScorer,
    score: Option<f64>,
    alignment: Option<&LocalAlignment>,
) {
    println!("Comparison Results");
    println!("{}", "=".repeat(60));

    println!("\nStrategy: {}", scorer.strategy());
    println!("Matrix: {}", scorer.matrix().name());
    if scorer.strategy() == Strategy::Alignment {
        let gaps = scorer.gaps();
        println!("Gap costs: open {}, extend {}", gaps.open, gaps.extend);
    }

    match score {
        Some(score) => println!("\nScore: {score}"),
        None => println!("\nScore: undefined"),
    }

    if scorer.strategy() == Strategy::Alignment {
        println!();
        match alignment {
            Some(alignment) => println!("{}", alignment.trace()),
            None => println!("{NO_ALIGNMENT_MARKER}"),
        }
    }
}

fn print_json_comparison(
    scorer: &PairScorer,
    seq_a: &str,
    seq_b: &str,
    score: Option<f64>,
    alignment: Option<&LocalAlignment>,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "seq_a": seq_a,
        "seq_b": seq_b,
        "strategy": scorer.strategy(),
        "matrix": scorer.matrix().name(),
        "gap_costs": scorer.gaps(),
        "score": score,
        "alignment": alignment.map(LocalAlignment::trace),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
