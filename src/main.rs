//! sitesweep main entry point
//!
//! This is the command-line interface for the sitesweep crawler.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sitesweep::config::{CrawlConfig, RecordPolicy, DEFAULT_WORKERS};
use sitesweep::crawler::run_crawl;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// sitesweep: map every page of a site to its HTTP status
///
/// Starting from a seed URL, sitesweep follows same-domain links until the
/// site is exhausted, then writes a CSV report of what it found. With
/// --broken-only the report lists only the URLs that answered with an
/// error status.
#[derive(Parser, Debug)]
#[command(name = "sitesweep")]
#[command(version = "0.1.0")]
#[command(about = "Same-domain crawler that records HTTP statuses", long_about = None)]
struct Cli {
    /// Seed URL to start from (http://, https://, or file://)
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Restrict the crawl to the seed's domain
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    same_domain: bool,

    /// Number of concurrent fetch workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Record only URLs that answered with a status of 400 or higher
    #[arg(long)]
    broken_only: bool,

    /// Per-request timeout in seconds; requests wait forever when omitted
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory the CSV report is written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// File the crawl log is appended to
    #[arg(long, value_name = "PATH", default_value = "sitesweep.log")]
    log_file: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, &cli.log_file)
        .with_context(|| format!("could not open log file {}", cli.log_file.display()))?;

    let policy = if cli.broken_only {
        RecordPolicy::BrokenOnly
    } else {
        RecordPolicy::All
    };

    // Validate the seed and build the crawl configuration
    let mut config = match CrawlConfig::new(&cli.start_url, cli.same_domain, cli.workers, policy) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to build crawl configuration: {}", e);
            return Err(e.into());
        }
    };
    config.timeout = cli.timeout.map(Duration::from_secs);
    config.output_dir = cli.output_dir;

    match run_crawl(config).await {
        Ok(_report) => Ok(()),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Log lines go to stdout and, stripped of ANSI colors, to the append-mode
/// log file, so every run leaves a durable trace of what it visited.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> std::io::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesweep=info,warn"),
            1 => EnvFilter::new("sitesweep=debug,info"),
            2 => EnvFilter::new("sitesweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(())
}
