//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the wave loop that drives a crawl:
//! - draining the frontier into a batch
//! - claiming each URL against the visited set
//! - dispatching claimed URLs to a bounded pool of fetch workers
//! - waiting for the whole wave before draining the next one
//!
//! Links discovered during a wave land in the frontier and are picked up by
//! the next drain. The crawl is done when a drain comes back empty after a
//! completed wave.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use url::Url;

use crate::config::{CrawlConfig, RecordPolicy};
use crate::crawler::fetcher::{build_http_client, fetch_local, fetch_url, is_html, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::report::VisitRecord;
use crate::url::{canonicalize, is_same_domain};
use crate::Result;

/// Outcome of a finished crawl run
#[derive(Debug)]
pub struct CrawlReport {
    /// Host key the crawl was scoped to; names the CSV file
    pub base_domain: String,

    /// Records kept under the configured policy, in visit-completion order
    pub records: Vec<VisitRecord>,

    /// Distinct canonical URLs visited
    pub pages_visited: usize,

    /// Number of dispatch waves the crawl took
    pub waves: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Drives a crawl from seed to empty frontier
pub struct Engine {
    config: Arc<CrawlConfig>,
    client: Client,
    frontier: Frontier,
    records: Mutex<Vec<VisitRecord>>,
}

impl Engine {
    /// Creates an engine with a seeded frontier and a ready HTTP client
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = build_http_client(config.timeout)?;

        let frontier = Frontier::new();
        frontier.seed(config.start_url.clone());

        Ok(Self {
            config: Arc::new(config),
            client,
            frontier,
            records: Mutex::new(Vec::new()),
        })
    }

    /// Runs the crawl to completion and returns the report
    ///
    /// Each iteration drains the frontier, filters the batch through the
    /// visited set, and fans the survivors out to at most `workers`
    /// concurrent visits. The await on the wave is the synchronization
    /// barrier: wave N finishes entirely before wave N+1 is drained.
    pub async fn run(self) -> CrawlReport {
        let started_at = Utc::now();
        let started = Instant::now();

        tracing::info!("Starting crawl of {}", self.config.start_url);
        if self.config.same_domain && !self.config.base_domain.is_empty() {
            tracing::info!("Restricting crawl to domain: {}", self.config.base_domain);
        } else if !self.config.same_domain {
            tracing::info!("Domain filter disabled, following every link");
        }
        tracing::info!(
            "Workers: {}, policy: {:?}",
            self.config.workers,
            self.config.policy
        );

        let mut waves = 0usize;
        loop {
            let batch = self.frontier.drain();
            if batch.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            // claim before dispatch; losers are duplicates from earlier waves
            let wave: Vec<String> = batch
                .into_iter()
                .filter(|url| self.frontier.try_claim(url))
                .collect();
            if wave.is_empty() {
                continue;
            }

            waves += 1;
            tracing::debug!("Wave {}: dispatching {} URLs", waves, wave.len());

            stream::iter(wave)
                .map(|url| self.visit(url))
                .buffer_unordered(self.config.workers)
                .collect::<Vec<_>>()
                .await;
        }

        let elapsed = started.elapsed();
        let pages_visited = self.frontier.visited_count();
        tracing::info!(
            "Crawl completed: {} pages visited in {:?} over {} waves",
            pages_visited,
            elapsed,
            waves
        );

        CrawlReport {
            base_domain: self.config.base_domain.clone(),
            records: self.records.into_inner().unwrap(),
            pages_visited,
            waves,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        }
    }

    /// Visits one claimed URL: fetch, record, extract, hand links back
    async fn visit(&self, url: String) {
        let outcome = if url.starts_with("file:") {
            fetch_local(&url).await
        } else {
            fetch_url(&self.client, &url).await
        };

        match outcome {
            FetchOutcome::Success {
                final_url,
                status,
                content_type,
                body,
            } => {
                if final_url.trim_end_matches('/') != url {
                    tracing::info!("Visited {} -> {} [{}]", url, final_url, status);
                } else {
                    tracing::info!("Visited {} [{}]", url, status);
                }

                self.record(&url, status);

                if is_html(&content_type) && should_follow(self.config.policy, status) {
                    self.handle_links(&url, &body);
                }
            }
            FetchOutcome::Failure { error } => {
                tracing::error!("Error visiting {}: {}", url, error);
                // sentinel status; BrokenOnly drops it, All records it
                self.record(&url, 0);
            }
        }
    }

    /// Keeps a visit record if the policy wants it
    fn record(&self, url: &str, status: u16) {
        if self.config.policy.keeps(status) {
            self.records.lock().unwrap().push(VisitRecord {
                url: url.to_string(),
                status,
            });
        }
    }

    /// Canonicalizes, filters, and pushes the links found on a page
    ///
    /// Pushes are unconditional; the claim check at dispatch time collapses
    /// the duplicates this produces.
    fn handle_links(&self, page_url: &str, body: &str) {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            // a pass-through canonical string; nothing to resolve against
            Err(_) => return,
        };

        let links = extract_links(body, &base);
        if links.is_empty() {
            return;
        }
        tracing::debug!("Found {} links on {}", links.len(), page_url);

        for link in &links {
            let canonical = canonicalize(link);
            if self.config.same_domain && !is_same_domain(&canonical, &self.config.base_domain) {
                tracing::debug!("Skipping off-domain link: {}", canonical);
                continue;
            }
            self.frontier.push(canonical);
        }
    }
}

/// Whether links from a page with this status should be followed
///
/// RecordAll crawls everything HTML, error pages included; BrokenOnly stops
/// at broken pages so a 404 contributes nothing to the frontier.
fn should_follow(policy: RecordPolicy, status: u16) -> bool {
    match policy {
        RecordPolicy::All => true,
        RecordPolicy::BrokenOnly => status < 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(policy: RecordPolicy, same_domain: bool) -> Engine {
        let config = CrawlConfig::new("https://example.com/", same_domain, 2, policy).unwrap();
        Engine::new(config).unwrap()
    }

    #[test]
    fn test_should_follow() {
        assert!(should_follow(RecordPolicy::All, 200));
        assert!(should_follow(RecordPolicy::All, 404));
        assert!(should_follow(RecordPolicy::BrokenOnly, 200));
        assert!(should_follow(RecordPolicy::BrokenOnly, 301));
        assert!(!should_follow(RecordPolicy::BrokenOnly, 404));
        assert!(!should_follow(RecordPolicy::BrokenOnly, 500));
    }

    #[test]
    fn test_record_all_keeps_everything() {
        let engine = engine_with(RecordPolicy::All, true);
        engine.record("https://example.com/ok", 200);
        engine.record("https://example.com/gone", 404);
        engine.record("https://example.com/dead", 0);

        let records = engine.records.lock().unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_broken_only_keeps_real_errors() {
        let engine = engine_with(RecordPolicy::BrokenOnly, true);
        engine.record("https://example.com/ok", 200);
        engine.record("https://example.com/gone", 404);
        engine.record("https://example.com/dead", 0);

        let records = engine.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/gone");
        assert_eq!(records[0].status, 404);
    }

    #[test]
    fn test_handle_links_applies_domain_filter() {
        let engine = engine_with(RecordPolicy::All, true);
        engine.frontier.drain(); // discard the seed

        let html = r#"
            <html><body>
                <a href="/a">in</a>
                <a href="https://www.example.com/b#frag">in, canonicalized</a>
                <a href="https://other.com/x">out</a>
                <a href="https://sub.example.com/y">out, subdomain</a>
            </body></html>
        "#;
        engine.handle_links("https://example.com/page", html);

        let batch = engine.frontier.drain();
        assert_eq!(batch.len(), 2);
        assert!(batch.contains(&"https://example.com/a".to_string()));
        assert!(batch.contains(&"https://example.com/b".to_string()));
    }

    #[test]
    fn test_handle_links_without_filter_keeps_foreign_domains() {
        let engine = engine_with(RecordPolicy::All, false);
        engine.frontier.drain();

        let html = r#"<html><body><a href="https://other.com/x">out</a></body></html>"#;
        engine.handle_links("https://example.com/page", html);

        let batch = engine.frontier.drain();
        assert_eq!(batch, vec!["https://other.com/x".to_string()]);
    }

    #[test]
    fn test_handle_links_pushes_duplicates() {
        let engine = engine_with(RecordPolicy::All, true);
        engine.frontier.drain();

        let html = r#"
            <html><body>
                <a href="/same">one</a>
                <a href="/same/">two, same after canonicalization</a>
            </body></html>
        "#;
        engine.handle_links("https://example.com/page", html);

        let batch = engine.frontier.drain();
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|u| u == "https://example.com/same"));
    }

    #[test]
    fn test_engine_seeds_frontier() {
        let engine = engine_with(RecordPolicy::All, true);
        let batch = engine.frontier.drain();
        assert_eq!(batch, vec!["https://example.com".to_string()]);
    }
}
