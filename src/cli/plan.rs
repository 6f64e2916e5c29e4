use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::store::SubstrateCatalog;
use crate::cli::OutputFormat;
use crate::core::config::default_worker_count;
use crate::core::summary::OversizedGroup;
use crate::scheduling::partition::{missing_groups, plan, PartitionStats};
use crate::utils::validation::DEFAULT_GROUP_SIZE_CEILING;

#[derive(Args)]
pub struct PlanArgs {
    /// Grouped-sequence table (JSON object of group -> sequences)
    #[arg(long, required = true)]
    pub groups: PathBuf,

    /// Number of partitions to plan (default: half the available cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Drop groups with this many distinct sequences or more
    #[arg(long, default_value_t = DEFAULT_GROUP_SIZE_CEILING)]
    pub ceiling: usize,

    /// List the groups assigned to each partition
    #[arg(long)]
    pub show_groups: bool,
}

pub fn run(args: PlanArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let worker_count = args.workers.unwrap_or_else(default_worker_count);

    let catalog = SubstrateCatalog::load_from_file(&args.groups, args.ceiling)
        .with_context(|| format!("Failed to load groups from {}", args.groups.display()))?;
    let partitions = plan(catalog.groups(), worker_count)?;

    let stats: Vec<PartitionStats> = partitions.iter().map(|p| p.stats()).collect();
    let missing: Vec<String> = missing_groups(catalog.groups(), &partitions)
        .into_iter()
        .map(str::to_string)
        .collect();

    match format {
        OutputFormat::Text => {
            print_text_plan(&args, &stats, &missing, catalog.oversized());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "worker_count": worker_count,
                "groups": catalog.len(),
                "partitions": stats,
                "missing_groups": missing,
                "oversized_groups": catalog.oversized(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("partition\tgroup_count\testimated_pairs");
            for partition in &stats {
                println!(
                    "{}\t{}\t{}",
                    partition.index + 1,
                    partition.group_count,
                    partition.estimated_pairs
                );
            }
        }
    }

    if !missing.is_empty() {
        anyhow::bail!("{} groups were not assigned to any partition", missing.len());
    }

    Ok(())
}

fn print_text_plan(
    args: &PlanArgs,
    stats: &[PartitionStats],
    missing: &[String],
    oversized: &[OversizedGroup],
) {
    println!("Partition Plan");
    println!("{}", "=".repeat(60));

    let total: u64 = stats.iter().map(|p| p.estimated_pairs).sum();
    let largest = stats.iter().map(|p| p.estimated_pairs).max().unwrap_or(0);
    let smallest = stats.iter().map(|p| p.estimated_pairs).min().unwrap_or(0);

    println!();
    for partition in stats {
        println!(
            "Partition {:>3}\t{:>6} groups\t{:>12} estimated pairs",
            partition.index + 1,
            partition.group_count,
            partition.estimated_pairs
        );
        if args.show_groups {
            for group in &partition.groups {
                println!("    {group}");
            }
        }
    }

    println!("\nTotal estimated pairs: {total}");
    println!("Spread (largest - smallest): {}", largest - smallest);
    println!("Missing groups: {}", missing.len());
    if !oversized.is_empty() {
        println!("Dropped over size ceiling: {}", oversized.len());
    }
}
