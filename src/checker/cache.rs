// src/checker/cache.rs
// =============================================================================
// In-memory cache of external link results, keyed by the raw href.
//
// Entries expire after CACHE_TTL. Expiry is lazy: a stale entry is dropped
// when somebody asks for it, there is no background sweep.
//
// The cache is shared by every concurrent probe, so the map sits behind a
// mutex. Two probes for the same new href can both miss and both hit the
// network; whichever finishes last wins the slot.
//
// Time comes from tokio::time::Instant so tests can fast-forward the clock.
// =============================================================================

use super::types::LinkCheckResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    result: LinkCheckResult,
    stored_at: Instant,
}

pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    // Returns the stored result and its age, if still fresh
    pub fn get(&self, href: &str) -> Option<(LinkCheckResult, Duration)> {
        let mut entries = self.entries.lock();
        let age = entries.get(href)?.stored_at.elapsed();

        if age >= self.ttl {
            entries.remove(href);
            return None;
        }

        entries.get(href).map(|entry| (entry.result.clone(), age))
    }

    pub fn put(&self, href: &str, result: LinkCheckResult) {
        self.entries.lock().insert(
            href.to_string(),
            CacheEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::types::{test_link, LinkStatus, LinkType};

    fn result(href: &str) -> LinkCheckResult {
        LinkCheckResult::new(test_link(LinkType::External, href), LinkStatus::Valid).with_status_code(200)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_returned() {
        let cache = ResultCache::new();
        cache.put("https://example.com", result("https://example.com"));

        tokio::time::advance(Duration::from_secs(60)).await;

        let (cached, age) = cache.get("https://example.com").unwrap();
        assert_eq!(cached.status_code, Some(200));
        assert!(age >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_is_evicted() {
        let cache = ResultCache::new();
        cache.put("https://example.com", result("https://example.com"));

        tokio::time::advance(CACHE_TTL).await;

        assert!(cache.get("https://example.com").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_exact() {
        let cache = ResultCache::new();
        cache.put("https://example.com", result("https://example.com"));
        assert!(cache.get("https://example.com/").is_none());
        assert_eq!(cache.len(), 1);
    }
}
