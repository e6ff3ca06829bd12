//! Time-bounded metadata cache shared by validators that fetch remote
//! archive metadata.
//!
//! Backed by a concurrent map so a single validator instance stays safe
//! under concurrent `validate` calls from a batch pipeline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

/// Default entry lifetime for fetched archive metadata.
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    fields: HashMap<String, String>,
    fetched_at: Instant,
}

/// Identifier → fetched-fields cache with a fixed TTL.
#[derive(Debug)]
pub struct MetadataCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl MetadataCache {
    /// Creates a cache with the given entry lifetime.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Creates a cache with the default 24-hour lifetime.
    #[must_use]
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_METADATA_TTL)
    }

    /// Returns the cached fields for `key`, evicting and returning `None`
    /// when the entry has expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<HashMap<String, String>> {
        let expired = match self.entries.get(key) {
            None => return None,
            Some(entry) => {
                if entry.fetched_at.elapsed() <= self.ttl {
                    trace!(key = %key, "metadata cache hit");
                    return Some(entry.fields.clone());
                }
                true
            }
        };
        if expired {
            trace!(key = %key, "metadata cache entry expired");
            self.entries.remove(key);
        }
        None
    }

    /// Stores fetched fields for `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, fields: HashMap<String, String>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                fields,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held (including not-yet-evicted
    /// expired ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() <= self.ttl);
        before - self.entries.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_cache_insert_and_get() {
        let cache = MetadataCache::with_default_ttl();
        cache.insert("SRR123456", fields(&[("organism", "Homo sapiens")]));
        let hit = cache.get("SRR123456").unwrap();
        assert_eq!(hit.get("organism").unwrap(), "Homo sapiens");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_miss_returns_none() {
        let cache = MetadataCache::with_default_ttl();
        assert!(cache.get("SRR123456").is_none());
    }

    #[test]
    fn test_cache_expired_entry_evicted_on_get() {
        let cache = MetadataCache::new(Duration::from_millis(0));
        cache.insert("SRR123456", fields(&[("organism", "Homo sapiens")]));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("SRR123456").is_none());
        assert!(cache.is_empty(), "expired entry must be evicted");
    }

    #[test]
    fn test_cache_purge_expired_counts_removals() {
        let cache = MetadataCache::new(Duration::from_millis(0));
        cache.insert("a", fields(&[("k", "v")]));
        cache.insert("b", fields(&[("k", "v")]));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_insert_replaces() {
        let cache = MetadataCache::with_default_ttl();
        cache.insert("a", fields(&[("k", "old")]));
        cache.insert("a", fields(&[("k", "new")]));
        assert_eq!(cache.get("a").unwrap().get("k").unwrap(), "new");
        assert_eq!(cache.len(), 1);
    }
}
