use url::Url;

use crate::url::canonicalize;

/// Builds the domain key a crawl is scoped to
///
/// The key is the lowercase host with one www. prefix removed, plus an
/// explicit port when one survives parsing (the parser drops scheme-default
/// ports, so "http://example.com:80" and "http://example.com" share a key).
/// URLs without a host, such as file:// URLs, key to the empty string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitesweep::url::host_key;
///
/// let url = Url::parse("https://www.Example.com/path").unwrap();
/// assert_eq!(host_key(&url), "example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), "127.0.0.1:8080");
/// ```
pub fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or("").to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Tests whether a candidate URL belongs to the crawl's base domain
///
/// The candidate is canonicalized first, then its host key is compared to
/// `base_domain` for exact string equality. Subdomains do not match their
/// parent domain. Candidates that do not parse are never same-domain.
pub fn is_same_domain(candidate: &str, base_domain: &str) -> bool {
    match Url::parse(&canonicalize(candidate)) {
        Ok(url) => host_key(&url) == base_domain,
        Err(_) => false,
    }
}
