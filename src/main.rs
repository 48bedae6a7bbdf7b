use anyhow::{Context, Result};
use clap::Parser;
use redata::{init_tracing_once, Ingestor, IngestReport, MemoryStore, ReplacePolicy, SqliteStore};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Cleans Reddit comments and keeps the best-scoring reply per parent in a database.
#[derive(Parser)]
#[command(name = "redata", version)]
struct Cli {
    /// Comment dump: JSONL, zstd-compressed JSONL, or a directory of RC_YYYY-MM dumps
    path: PathBuf,

    /// SQLite database file to write comments into
    #[arg(long, default_value = "reddit.sqlite")]
    db: PathBuf,

    /// Maximum number of linked pairs to save (-1 = no limit)
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true,
          value_parser = clap::value_parser!(i64).range(-1..))]
    limit: i64,

    /// What to do with a reply when a sibling scoring at least as well is stored: keep-all or best-only
    #[arg(long, default_value_t = ReplacePolicy::BestOnly)]
    policy: ReplacePolicy,

    /// Run against an in-memory store (nothing is written)
    #[arg(long)]
    in_memory: bool,

    /// Keep comments already in the database instead of clearing it first
    #[arg(long)]
    keep_existing: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn print_time(elapsed: Duration, header: &str) {
    let secs = elapsed.as_secs_f64();
    println!("{} took {} min {} sec", header, (secs / 60.0).floor(), (secs % 60.0).ceil());
}

fn print_summary(report: &IngestReport) {
    println!("Processed comments: {}", report.stats.total_processed);
    println!("Inserted comments: {}", report.stats.inserted);
    println!("Valid pairs: {}", report.stats.linked_pairs);
}

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();
    let t0 = Instant::now();

    let ingestor = Ingestor::new()
        .max_pairs(cli.limit)
        .policy(cli.policy)
        .reset_store(!cli.keep_existing)
        .progress(!cli.no_progress)
        .progress_label("Retrieving comments from file...");

    let report = if cli.in_memory {
        let mut store = MemoryStore::new();
        ingestor
            .run(&cli.path, &mut store)
            .with_context(|| format!("ingesting {}", cli.path.display()))?
    } else {
        let mut store = SqliteStore::open(&cli.db)
            .with_context(|| format!("opening database {}", cli.db.display()))?;
        ingestor
            .run_sqlite(&cli.path, &mut store)
            .with_context(|| format!("ingesting {} into {}", cli.path.display(), store.path().display()))?
    };

    print_summary(&report);
    if report.stats.replaced > 0 || report.stats.discarded > 0 {
        println!(
            "Replaced comments: {}  Discarded comments: {}",
            report.stats.replaced, report.stats.discarded
        );
    }
    print_time(t0.elapsed(), "Execution");
    Ok(())
}
