//! dblp-venues - per-author publication counts from dblp
//!
//! ## Usage
//!
//! ```bash
//! dblp-venues all -o venues.csv
//! dblp-venues conferences --config venues.json -o confs.csv
//! dblp-venues names CVPR2017.txt ICML2017.txt -o names.csv --min-count 15
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dblp_venues::{
    client::{DblpClient, HttpFetcher},
    config::PipelineConfig,
    export, names::NameTally,
    pipeline,
    report::RunReport,
    table::VenueTable,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Scrape dblp for per-author publication counts across venues
#[derive(Parser)]
#[command(name = "dblp-venues")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// JSON config file overriding the built-in venue lists
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape configured conferences
    Conferences {
        /// Output CSV file
        #[arg(short, long, default_value = "conferences.csv")]
        output: PathBuf,
    },

    /// Scrape configured journals
    Journals {
        /// Output CSV file
        #[arg(short, long, default_value = "journals.csv")]
        output: PathBuf,
    },

    /// Scrape conferences and journals and join them
    All {
        /// Output CSV file
        #[arg(short, long, default_value = "venues.csv")]
        output: PathBuf,
    },

    /// Count author names in local text dumps (one file per venue and year)
    Names {
        /// Dump files; each file's stem becomes its label, e.g. CVPR2017
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output CSV file
        #[arg(short, long, default_value = "names.csv")]
        output: PathBuf,

        /// Keep names seen at least this many times (default from config)
        #[arg(long)]
        min_count: Option<u32>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Conferences { output } => {
            let client = build_client(&config)?;
            let (table, report) = pipeline::conference_table(&client, &config).await;
            finish(&output, &table, &report, &config.conference_columns())
        }
        Commands::Journals { output } => {
            let client = build_client(&config)?;
            let (table, report) = pipeline::journal_table(&client, &config).await;
            finish(&output, &table, &report, &config.journal_columns())
        }
        Commands::All { output } => {
            let client = build_client(&config)?;
            let (table, report) = pipeline::consolidated_table(&client, &config).await;
            finish(&output, &table, &report, &config.venue_columns())
        }
        Commands::Names {
            files,
            output,
            min_count,
        } => run_names(&files, &output, min_count.unwrap_or(config.min_name_count)),
    }
}

fn build_client(config: &PipelineConfig) -> Result<DblpClient<HttpFetcher>> {
    let fetcher = HttpFetcher::from_config(config).context("Failed to build HTTP client")?;
    Ok(DblpClient::new(fetcher, config))
}

/// Export the table and print the per-query report.
fn finish(output: &Path, table: &VenueTable, report: &RunReport, columns: &[String]) -> Result<()> {
    report.log_summary();

    export::save_venue_table(output, table, columns)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("\n{}", report);
    println!("Saved {} rows to {}", table.len(), output.display());
    Ok(())
}

fn run_names(files: &[PathBuf], output: &Path, min_count: u32) -> Result<()> {
    let mut tally = NameTally::new();
    for file in files {
        tally
            .add_file(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        info!(file = %file.display(), "Processed dump");
    }

    let report = tally.report(min_count);
    export::save_name_report(output, &report)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved {} names to {}", report.rows.len(), output.display());
    Ok(())
}
