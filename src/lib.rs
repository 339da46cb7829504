//! Sitesweep: a same-domain status-mapping crawler
//!
//! This crate implements a breadth-style crawler that starts from a single
//! seed URL, follows anchors within the seed's domain, and writes a CSV
//! report mapping every visited page to its HTTP status.

pub mod config;
pub mod crawler;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for sitesweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid seed URL '{url}': {reason}")]
    Seed { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("report error: {0}")]
    Report(#[from] report::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sitesweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Re-export commonly used types
pub use config::{CrawlConfig, RecordPolicy};
pub use crawler::{run_crawl, CrawlReport, Engine};
pub use report::VisitRecord;
pub use url::{canonicalize, is_same_domain};
