use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::Args;
use tracing::info;

use crate::catalog::scores::{FilterSummary, NormalizedScoreTable, SpecificityFilter};
use crate::catalog::store::SubstrateCatalog;
use crate::cli::{MatrixArgs, OutputFormat};
use crate::core::config::{default_worker_count, RankingConfig, DEFAULT_SPECIFICITY_THRESHOLD};
use crate::core::query::TargetQuery;
use crate::core::summary::OversizedGroup;
use crate::core::types::Strategy;
use crate::matching::engine::{RankedTable, RankingEngine};
use crate::parsing::fasta::{is_fasta_file, parse_query_file};
use crate::utils::validation::DEFAULT_GROUP_SIZE_CEILING;

/// Timestamp prefix of ranked table file names
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M";

/// Column headers of a ranked table
pub const RANKED_TABLE_HEADER: [&str; 4] =
    ["group_id", "candidate_sequence", "score", "alignment_or_marker"];

#[derive(Args)]
pub struct RankArgs {
    /// Grouped-sequence table (JSON object of group -> sequences)
    #[arg(long, required = true)]
    pub groups: PathBuf,

    /// Normalized score table written by `score`
    #[arg(long, required = true)]
    pub scores: PathBuf,

    /// Query peptides (FASTA, optionally gzipped)
    #[arg(short, long, required = true)]
    pub queries: PathBuf,

    /// Directory for the per-query ranked tables
    #[arg(short, long, required = true)]
    pub out_dir: PathBuf,

    /// Minimum normalized score for a group to be a candidate
    #[arg(short, long, default_value_t = DEFAULT_SPECIFICITY_THRESHOLD)]
    pub threshold: f64,

    /// Leave out single-site groups
    #[arg(long)]
    pub no_singletons: bool,

    /// Never use this group as a candidate (repeatable)
    #[arg(long = "exclude", value_name = "GROUP")]
    pub exclude: Vec<String>,

    /// Number of queries ranked in parallel (default: half the available cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Drop groups with this many distinct sequences or more
    #[arg(long, default_value_t = DEFAULT_GROUP_SIZE_CEILING)]
    pub ceiling: usize,

    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Append the processed queries to this file, under a timestamp line
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,
}

impl RankArgs {
    fn config(&self) -> RankingConfig {
        RankingConfig {
            specificity_threshold: self.threshold,
            include_singletons: !self.no_singletons,
            denylist: self.exclude.clone(),
            worker_count: self.workers.unwrap_or_else(default_worker_count),
        }
    }
}

/// A ranked table and the file it was written to
struct WrittenTable {
    table: RankedTable,
    path: PathBuf,
}

pub fn run(args: RankArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.config();
    config.validate()?;

    if !is_fasta_file(&args.queries) {
        anyhow::bail!(
            "{} is not a FASTA file (expected .fa, .fasta or .faa, optionally gzipped)",
            args.queries.display()
        );
    }

    let catalog = SubstrateCatalog::load_from_file(&args.groups, args.ceiling)
        .with_context(|| format!("Failed to load groups from {}", args.groups.display()))?;
    let table = NormalizedScoreTable::load_from_file(&args.scores)
        .with_context(|| format!("Failed to load scores from {}", args.scores.display()))?;
    let queries = parse_query_file(&args.queries)
        .with_context(|| format!("Failed to read queries from {}", args.queries.display()))?;

    let filter = SpecificityFilter::from(&config);
    let (candidates, filter_summary) = filter.select(&catalog, &table);
    if candidates.is_empty() {
        anyhow::bail!(
            "No groups pass the specificity threshold {}",
            config.specificity_threshold
        );
    }

    if verbose {
        eprintln!(
            "{} candidate groups, {} queries",
            candidates.len(),
            queries.len()
        );
    }

    let scorer = args.matrix.build_scorer(Strategy::Alignment)?;
    let engine = RankingEngine::new(candidates, &scorer);
    let tables = engine.rank_all(&queries, config.worker_count)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT).to_string();
    let mut used_names = HashSet::new();
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let file_name = output_file_name(&timestamp, &table.query, &mut used_names)?;
        let path = args.out_dir.join(file_name);
        write_ranked_table(&path, &table)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} rows to {}", table.rows.len(), path.display());
        written.push(WrittenTable { table, path });
    }

    if let Some(archive) = &args.archive {
        append_to_archive(archive, &timestamp, &queries)
            .with_context(|| format!("Failed to append to {}", archive.display()))?;
    }

    match format {
        OutputFormat::Text => {
            print_text_results(&config, &filter_summary, catalog.oversized(), &written);
        }
        OutputFormat::Json => {
            print_json_results(&config, &filter_summary, catalog.oversized(), &written)?;
        }
        OutputFormat::Tsv => print_tsv_results(&written),
    }

    Ok(())
}

/// `<timestamp>-<short code>.tsv`, suffixed `_2`, `_3`, ... when codes collide
fn output_file_name(
    timestamp: &str,
    query: &TargetQuery,
    used: &mut HashSet<String>,
) -> anyhow::Result<String> {
    let code = query
        .short_code()
        .with_context(|| format!("Cannot derive a file name from query '{}'", query.id))?;

    let mut name = format!("{timestamp}-{code}.tsv");
    let mut n = 1;
    while !used.insert(name.clone()) {
        n += 1;
        name = format!("{timestamp}-{code}_{n}.tsv");
    }
    Ok(name)
}

/// Write one ranked table as tab-delimited text.
///
/// Undefined scores are left empty; multi-line alignments are quoted.
pub fn write_ranked_table(path: &Path, table: &RankedTable) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;

    writer.write_record(RANKED_TABLE_HEADER)?;
    for row in &table.rows {
        let score = row.score.map(|s| s.to_string()).unwrap_or_default();
        writer.write_record([
            row.group.as_str(),
            row.candidate.as_str(),
            score.as_str(),
            row.alignment_or_marker(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn append_to_archive(path: &Path, timestamp: &str, queries: &[TargetQuery]) -> anyhow::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{timestamp}")?;
    for query in queries {
        writeln!(file, ">{}\n{}", query.id, query.sequence)?;
    }
    writeln!(file)?;
    Ok(())
}

fn print_text_results(
    config: &RankingConfig,
    filter: &FilterSummary,
    oversized: &[OversizedGroup],
    written: &[WrittenTable],
) {
    println!("Ranking Results");
    println!("{}", "=".repeat(60));

    println!(
        "\nCandidate groups: {} (threshold {}, singletons {})",
        filter.selected,
        config.specificity_threshold,
        if config.include_singletons {
            "included"
        } else {
            "excluded"
        }
    );
    if !filter.denylisted.is_empty() {
        println!("  Excluded: {}", filter.denylisted.join(", "));
    }
    if !filter.unscored.is_empty() {
        println!("  Without a score: {}", filter.unscored.len());
    }
    if !oversized.is_empty() {
        println!("  Over size ceiling: {}", oversized.len());
        for group in oversized {
            println!("    {} ({} sequences)", group.group, group.size);
        }
    }

    for entry in written {
        let table = &entry.table;
        println!("\n{}", table.query.id);
        println!("  Candidates aligned: {}/{}", table.aligned(), table.rows.len());
        if let Some(best) = table.best() {
            println!(
                "  Best: {} {} (score {})",
                best.group,
                best.candidate,
                best.score.unwrap_or_default()
            );
        }
        println!("  Written to {}", entry.path.display());
    }
}

fn print_json_results(
    config: &RankingConfig,
    filter: &FilterSummary,
    oversized: &[OversizedGroup],
    written: &[WrittenTable],
) -> anyhow::Result<()> {
    let queries: Vec<serde_json::Value> = written
        .iter()
        .map(|entry| {
            serde_json::json!({
                "query": entry.table.query.id,
                "file": entry.path.display().to_string(),
                "rows": entry.table.rows.len(),
                "aligned": entry.table.aligned(),
                "best": entry.table.best(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "config": config,
        "filter": filter,
        "oversized_groups": oversized,
        "queries": queries,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(written: &[WrittenTable]) {
    println!("query\tfile\trows\taligned\tbest_group\tbest_score");
    for entry in written {
        let table = &entry.table;
        let (group, score) = table.best().map_or((String::new(), String::new()), |best| {
            (
                best.group.clone(),
                best.score.map(|s| s.to_string()).unwrap_or_default(),
            )
        });
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            table.query.id,
            entry.path.display(),
            table.rows.len(),
            table.aligned(),
            group,
            score
        );
    }
}
