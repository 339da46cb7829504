//! Configuration module for sitesweep
//!
//! A crawl is configured entirely from the command line; this module turns
//! the parsed arguments into a validated [`CrawlConfig`]. Seed validation is
//! the one fatal error a run can hit before any fetching starts.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::url::{canonicalize, host_key};
use crate::{Result, SweepError};

/// Default size of the fetch worker pool
pub const DEFAULT_WORKERS: usize = 10;

/// Which visits end up in the CSV report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPolicy {
    /// One row per visited URL: the URL and its final status
    All,
    /// Rows only for URLs that answered with a status >= 400
    BrokenOnly,
}

impl RecordPolicy {
    /// Returns true if a visit with this status should be recorded
    pub fn keeps(&self, status: u16) -> bool {
        match self {
            RecordPolicy::All => true,
            RecordPolicy::BrokenOnly => status >= 400,
        }
    }
}

/// Validated configuration for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Canonical form of the seed URL
    pub start_url: String,

    /// Host key the domain filter compares against (empty for file:// seeds)
    pub base_domain: String,

    /// Restrict the crawl to the seed's domain
    pub same_domain: bool,

    /// Number of concurrent fetches in flight per wave
    pub workers: usize,

    /// Which visits are recorded
    pub policy: RecordPolicy,

    /// Per-request timeout; None lets requests run as long as they need
    pub timeout: Option<Duration>,

    /// Directory the CSV report is written into
    pub output_dir: PathBuf,
}

impl CrawlConfig {
    /// Builds a config from raw CLI values, validating the seed URL
    ///
    /// The seed is canonicalized and must parse with an http, https, or
    /// file scheme; anything else is a startup error. The base domain is
    /// the seed's host key.
    pub fn new(
        seed: &str,
        same_domain: bool,
        workers: usize,
        policy: RecordPolicy,
    ) -> Result<Self> {
        let start_url = canonicalize(seed);
        let url = Url::parse(&start_url).map_err(|e| SweepError::Seed {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" | "file" => {}
            other => {
                return Err(SweepError::Seed {
                    url: seed.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                })
            }
        }

        Ok(Self {
            base_domain: host_key(&url),
            start_url,
            same_domain,
            workers: workers.max(1),
            policy,
            timeout: None,
            output_dir: PathBuf::from("."),
        })
    }
}
