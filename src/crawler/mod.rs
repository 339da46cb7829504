//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - the frontier and visited set
//! - HTTP and local-file fetching
//! - HTML link extraction
//! - the wave-based crawl engine

mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlReport, Engine};
pub use fetcher::{build_http_client, fetch_local, fetch_url, is_html, FetchOutcome, USER_AGENT};
pub use frontier::Frontier;
pub use parser::extract_links;

use crate::config::CrawlConfig;
use crate::report::{report_path, write_report};
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the engine (HTTP client + seeded frontier)
/// 2. Run the wave loop until the frontier stays empty
/// 3. Hand the accumulated records to the CSV sink
///
/// A sink failure is logged and swallowed; by that point the crawl itself
/// has succeeded and the records are still returned to the caller.
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlReport> {
    let engine = Engine::new(config.clone())?;
    let report = engine.run().await;

    if report.records.is_empty() {
        tracing::info!("Nothing to record");
        return Ok(report);
    }

    let path = report_path(&config.output_dir, &report.base_domain);
    match write_report(&report.records, config.policy, &path) {
        Ok(()) => tracing::info!(
            "Wrote {} records to {}",
            report.records.len(),
            path.display()
        ),
        Err(e) => tracing::error!("Failed to write {}: {}", path.display(), e),
    }

    Ok(report)
}
