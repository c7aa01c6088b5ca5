//! URL deduplication within a single crawl.

use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe set of URLs seen by one crawl. A fresh set is created for
/// every `Engine::start`.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks `url` as visited. Returns true if the URL was
    /// newly added, false if it had been marked before. The single locked
    /// check-and-insert is what makes the dedup race-free across workers.
    pub fn mark_if_not_visited(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.to_string())
    }

    /// Non-marking membership check, used to skip enqueueing links that
    /// are already known. The authoritative gate remains
    /// `mark_if_not_visited` at processing time.
    pub fn contains(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(url)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
