use std::collections::HashSet;
use std::sync::Mutex;

/// Work queue and visited set for a crawl run
///
/// The pending side is an unordered multiset: pushes are unconditional and
/// duplicates are expected, because many pages link to the same URL. Dedup
/// happens at dispatch time through [`Frontier::try_claim`], which inserts
/// into the visited set and reports whether the caller won the URL. A URL
/// is claimed before its fetch starts, so no canonical URL is ever fetched
/// twice in one run.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: Mutex<Vec<String>>,
    visited: Mutex<HashSet<String>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues the seed URL
    pub fn seed(&self, url: String) {
        self.push(url);
    }

    /// Appends a canonical URL to the pending batch, duplicates and all
    pub fn push(&self, url: String) {
        self.pending.lock().unwrap().push(url);
    }

    /// Atomically marks a URL visited; true exactly once per URL
    pub fn try_claim(&self, url: &str) -> bool {
        self.visited.lock().unwrap().insert(url.to_string())
    }

    /// Takes the whole pending batch, leaving the frontier empty
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.lock().unwrap().len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_drain_takes_everything() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com".to_string());
        frontier.push("https://example.com/a".to_string());
        frontier.push("https://example.com/b".to_string());

        let batch = frontier.drain();
        assert_eq!(batch.len(), 3);
        assert_eq!(frontier.pending_count(), 0);
        assert!(frontier.drain().is_empty());
    }

    #[test]
    fn test_push_allows_duplicates() {
        let frontier = Frontier::new();
        frontier.push("https://example.com/a".to_string());
        frontier.push("https://example.com/a".to_string());
        assert_eq!(frontier.pending_count(), 2);
    }

    #[test]
    fn test_claim_succeeds_once() {
        let frontier = Frontier::new();
        assert!(frontier.try_claim("https://example.com/a"));
        assert!(!frontier.try_claim("https://example.com/a"));
        assert!(frontier.try_claim("https://example.com/b"));
        assert_eq!(frontier.visited_count(), 2);
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let frontier = Arc::new(Frontier::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                std::thread::spawn(move || frontier.try_claim("https://example.com/contested"))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_pushes_after_drain_land_in_next_batch() {
        let frontier = Frontier::new();
        frontier.push("https://example.com/a".to_string());
        let first = frontier.drain();
        assert_eq!(first, vec!["https://example.com/a".to_string()]);

        frontier.push("https://example.com/b".to_string());
        let second = frontier.drain();
        assert_eq!(second, vec!["https://example.com/b".to_string()]);
    }
}
