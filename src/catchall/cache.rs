use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::types::CatchAllDetectionResult;

/// Observable cache counters for monitoring.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatistics {
    pub enabled: bool,
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheStatistics {
    pub(crate) fn disabled() -> Self {
        Self {
            enabled: false,
            size: 0,
            hits: 0,
            misses: 0,
            hit_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: CatchAllDetectionResult,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Concurrent domain-keyed store of detection results.
///
/// Keys are always lowercased. Expired entries are evicted on read; under
/// capacity pressure the insert path first drops expired entries, then the
/// tenth of the cache expiring soonest. Readers racing an eviction may see a
/// result that was about to be dropped, which is acceptable.
pub(crate) struct DomainCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DomainCache {
    pub(crate) fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_size: max_size.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(&self, domain: &str) -> Option<CatchAllDetectionResult> {
        let key = domain.to_ascii_lowercase();
        let found = match self.entries.get(&key) {
            Some(entry) if entry.is_expired() => {
                drop(entry);
                self.entries.remove(&key);
                None
            }
            Some(entry) => Some(entry.result.clone()),
            None => None,
        };
        match &found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub(crate) fn insert(&self, domain: &str, result: CatchAllDetectionResult) {
        if self.entries.len() >= self.max_size {
            self.evict_expired();
            if self.entries.len() >= self.max_size {
                self.evict_soonest_expiring((self.max_size / 10).max(1));
            }
        }
        self.entries.insert(
            domain.to_ascii_lowercase(),
            CacheEntry {
                result,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    fn evict_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }

    fn evict_soonest_expiring(&self, count: usize) {
        let mut deadlines: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.expires_at))
            .collect();
        deadlines.sort_by_key(|(_, expires_at)| *expires_at);
        for (key, _) in deadlines.into_iter().take(count) {
            self.entries.remove(&key);
        }
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub(crate) fn statistics(&self) -> CacheStatistics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStatistics {
            enabled: true,
            size: self.entries.len(),
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catchall::types::Confidence;

    fn result(confidence: Confidence) -> CatchAllDetectionResult {
        CatchAllDetectionResult {
            confidence,
            diagnostic: None,
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let cache = DomainCache::new(Duration::from_secs(60), 100);
        cache.insert("Example.COM", result(Confidence::Confirmed));
        let hit = cache.get("example.com").expect("cached");
        assert_eq!(hit.confidence, Confidence::Confirmed);
    }

    #[test]
    fn expired_entries_are_evicted_on_read() {
        let cache = DomainCache::new(Duration::from_millis(0), 100);
        cache.insert("example.com", result(Confidence::NotDetected));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("example.com").is_none());
        assert_eq!(cache.statistics().size, 0);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let cache = DomainCache::new(Duration::from_secs(60), 20);
        for i in 0..200 {
            cache.insert(&format!("domain-{i}.example"), result(Confidence::NotDetected));
            assert!(cache.statistics().size <= 20, "insert {i} overflowed");
        }
    }

    #[test]
    fn capacity_eviction_drops_soonest_expiring() {
        let cache = DomainCache::new(Duration::from_secs(60), 10);
        for i in 0..10 {
            cache.insert(&format!("old-{i}.example"), result(Confidence::NotDetected));
        }
        cache.insert("fresh.example", result(Confidence::Confirmed));
        assert!(cache.get("fresh.example").is_some());
        assert!(cache.statistics().size <= 10);
    }

    #[test]
    fn statistics_track_hits_and_misses() {
        let cache = DomainCache::new(Duration::from_secs(60), 100);
        cache.insert("example.com", result(Confidence::Confirmed));
        cache.get("example.com");
        cache.get("example.com");
        cache.get("absent.example");
        let stats = cache.statistics();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn clear_resets_entries_and_counters() {
        let cache = DomainCache::new(Duration::from_secs(60), 100);
        cache.insert("example.com", result(Confidence::Confirmed));
        cache.get("example.com");
        cache.clear();
        let stats = cache.statistics();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert!(cache.get("example.com").is_none());
    }
}
