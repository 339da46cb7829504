use url::Url;

/// Reduces a URL to its canonical form
///
/// # Canonicalization Steps
///
/// 1. Parse the URL
/// 2. Lowercase the host
/// 3. Remove one leading www. prefix from the host
/// 4. Remove the fragment (everything after #)
/// 5. Re-serialize and trim trailing slashes
///
/// Two spellings of the same page ("https://www.Example.com/a/#top" and
/// "https://example.com/a") collapse to one canonical string, which is what
/// the visited set keys on.
///
/// This function never fails. Input that does not parse as an absolute URL
/// is passed through with only the fragment and trailing slashes removed,
/// so a junk href degrades to a junk frontier entry instead of an error.
///
/// # Examples
///
/// ```
/// use sitesweep::url::canonicalize;
///
/// assert_eq!(
///     canonicalize("https://WWW.Example.com/a/#top"),
///     "https://example.com/a"
/// );
/// ```
pub fn canonicalize(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if let Some(host) = url.host_str() {
                let mut canonical_host = host.to_lowercase();
                if let Some(stripped) = canonical_host.strip_prefix("www.") {
                    canonical_host = stripped.to_string();
                }
                if url.set_host(Some(&canonical_host)).is_err() {
                    return strip_raw(raw);
                }
            }

            url.set_fragment(None);

            url.to_string().trim_end_matches('/').to_string()
        }
        Err(_) => strip_raw(raw),
    }
}

/// Best-effort canonical form for input the parser rejects
fn strip_raw(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    without_fragment.trim_end_matches('/').to_string()
}
