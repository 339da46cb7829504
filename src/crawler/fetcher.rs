//! Page retrieval for the crawler
//!
//! This module handles both ways a page can be visited:
//! - HTTP(S) GET requests through a shared client, redirects followed
//! - Local reads for file:// URLs
//!
//! Failures here are expected outcomes, not errors: a refused connection or
//! a missing file comes back as [`FetchOutcome::Failure`] and the engine
//! turns it into the sentinel status record.

use std::time::Duration;

use reqwest::{redirect::Policy, Client};
use url::Url;

/// User-agent header sent with every request
pub const USER_AGENT: &str = concat!("sitesweep/", env!("CARGO_PKG_VERSION"));

/// Longest redirect chain the client will follow
const MAX_REDIRECT_HOPS: usize = 10;

/// Result of visiting a single URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered; any status counts, including 4xx and 5xx
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code of the final response
        status: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Response body
        body: String,
    },

    /// The request never produced a status (DNS, connect, read failure)
    Failure {
        /// Error description for the log
        error: String,
    },
}

/// Builds the HTTP client shared by all fetch workers
///
/// Requests run without a timeout unless one is configured; a slow page is
/// not a broken page. Redirects are followed up to [`MAX_REDIRECT_HOPS`],
/// with each hop logged so redirect chains are visible in the crawl log.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let redirect_policy = Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECT_HOPS {
            attempt.error("too many redirects")
        } else {
            if let Some(previous) = attempt.previous().last() {
                tracing::debug!("Redirect: {} -> {}", previous, attempt.url());
            }
            attempt.follow()
        }
    });

    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(redirect_policy)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fetches a URL over HTTP(S)
///
/// The returned status is the final one after redirects. Transport errors
/// are classified into readable descriptions; none of them abort the crawl.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            match response.text().await {
                Ok(body) => FetchOutcome::Success {
                    final_url,
                    status,
                    content_type,
                    body,
                },
                Err(e) => FetchOutcome::Failure {
                    error: format!("body read failed: {}", e),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else if e.is_redirect() {
                "redirect limit reached".to_string()
            } else {
                e.to_string()
            };
            FetchOutcome::Failure { error }
        }
    }
}

/// Reads a file:// URL from disk
///
/// A readable file is reported as a 200 text/html page so it flows through
/// the same recording and extraction path as a fetched one.
pub async fn fetch_local(url: &str) -> FetchOutcome {
    let path = match Url::parse(url).ok().and_then(|u| u.to_file_path().ok()) {
        Some(path) => path,
        None => {
            return FetchOutcome::Failure {
                error: format!("not a usable file path: {}", url),
            }
        }
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(body) => FetchOutcome::Success {
            final_url: url.to_string(),
            status: 200,
            content_type: "text/html".to_string(),
            body,
        },
        Err(e) => FetchOutcome::Failure {
            error: format!("{}: {}", path.display(), e),
        },
    }
}

/// Returns true if a Content-Type header describes an HTML page
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}
