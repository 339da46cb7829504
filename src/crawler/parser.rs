//! HTML link extraction
//!
//! This module pulls anchor hrefs out of a page body and resolves them into
//! absolute URLs. It deliberately keeps every fetchable link, duplicates
//! included; deduplication belongs to the visited set, not the parser.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - data URIs
/// - fragment-only anchors (same-page jumps)
/// - hrefs that do not resolve to http, https, or file URLs
///
/// `rel="nofollow"` links are followed; this crawler maps pages, it does
/// not rank them.
///
/// # Example
///
/// ```
/// use sitesweep::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/about">About</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/about"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - hrefs that fail to resolve
/// - schemes the fetcher cannot visit
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => match absolute_url.scheme() {
            "http" | "https" | "file" => Some(absolute_url.to_string()),
            _ => None,
        },
        Err(_) => None,
    }
}
