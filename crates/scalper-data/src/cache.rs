//! Time-keyed value cache.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tokio::time::Instant;

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// TTL cache: an entry is either fresh or absent.
///
/// Eviction is lazy; a stale entry is removed on the lookup that finds
/// it expired. There is no size bound, entries churn on the TTL instead.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Fetch a fresh value, expiring the entry if its TTL has lapsed.
    pub fn get(&self, key: &str) -> Option<T> {
        use std::sync::atomic::Ordering;

        let stale = {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if stale {
            self.entries.write().unwrap().remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn stats(&self) -> CacheStats {
        use std::sync::atomic::Ordering;
        CacheStats {
            entries: self.entries.read().unwrap().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_round_trips() {
        let cache = TtlCache::new(Duration::from_secs(30));
        cache.insert("quote/AAPL", 187.5_f64);
        assert_eq!(cache.get("quote/AAPL"), Some(187.5));
        assert_eq!(cache.get("quote/MSFT"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_lazily() {
        let cache = TtlCache::new(Duration::from_secs(30));
        cache.insert("quote/AAPL", 187.5_f64);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get("quote/AAPL"), None);
        // The stale entry was evicted by the lookup.
        assert_eq!(cache.stats().entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_count_hits_and_misses() {
        let cache = TtlCache::new(Duration::from_secs(30));
        cache.insert("k", 1_u32);
        cache.get("k");
        cache.get("k");
        cache.get("absent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }
}
