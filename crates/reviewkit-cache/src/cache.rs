use dashmap::DashMap;
use parking_lot::RwLock;
use reviewkit_core::{CacheConfig, RealReview, ReviewKey};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cached review page with its capture timestamp
#[derive(Debug, Clone)]
struct CacheEntry {
    reviews: Vec<RealReview>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(reviews: Vec<RealReview>) -> Self {
        Self {
            reviews,
            fetched_at: Instant::now(),
        }
    }

    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Whether a cached page is inside the staleness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Read outcome for a present entry. Stale entries are still returned;
/// the resolver decides whether to refresh behind them.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub reviews: Vec<RealReview>,
    pub freshness: Freshness,
    pub age: Duration,
}

impl CacheHit {
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }
}

/// Bounded LRU store for fetched review pages, keyed by provider and kind.
///
/// Entries are replaced whole on every `set` and only removed by
/// replacement, invalidation or capacity eviction; aging past the staleness
/// threshold downgrades a read to `Freshness::Stale` instead of dropping it.
pub struct ReviewCache {
    entries: DashMap<ReviewKey, CacheEntry>,
    access_order: Arc<RwLock<VecDeque<ReviewKey>>>,
    config: CacheConfig,
    hits: AtomicU64,
    stale_hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
}

impl ReviewCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            access_order: Arc::new(RwLock::new(VecDeque::new())),
            config,
            hits: AtomicU64::new(0),
            stale_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &ReviewKey) -> Option<CacheHit> {
        let entry = match self.entries.get(key) {
            Some(entry) => entry,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let age = entry.age();
        let freshness = if age < self.config.staleness_threshold {
            Freshness::Fresh
        } else {
            Freshness::Stale
        };
        let reviews = entry.reviews.clone();
        drop(entry);

        match freshness {
            Freshness::Fresh => self.hits.fetch_add(1, Ordering::Relaxed),
            Freshness::Stale => self.stale_hits.fetch_add(1, Ordering::Relaxed),
        };

        self.touch(key);

        Some(CacheHit {
            reviews,
            freshness,
            age,
        })
    }

    /// Stores a freshly fetched page, replacing any previous entry whole.
    pub fn set(&self, key: ReviewKey, reviews: Vec<RealReview>) {
        if !self.entries.contains_key(&key) {
            self.ensure_capacity();
        }
        self.entries.insert(key.clone(), CacheEntry::new(reviews));
        self.insertions.fetch_add(1, Ordering::Relaxed);
        self.touch(&key);
    }

    /// Drops one entry, typically right after a review submission so the
    /// next read refetches. Returns whether an entry was present.
    pub fn invalidate(&self, key: &ReviewKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        let mut access_order = self.access_order.write();
        if let Some(pos) = access_order.iter().position(|k| k == key) {
            access_order.remove(pos);
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.access_order.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.config.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn touch(&self, key: &ReviewKey) {
        let mut access_order = self.access_order.write();
        if let Some(pos) = access_order.iter().position(|k| k == key) {
            access_order.remove(pos);
        }
        access_order.push_back(key.clone());
    }

    fn ensure_capacity(&self) {
        while self.entries.len() >= self.config.max_entries {
            let mut access_order = self.access_order.write();
            if let Some(oldest_key) = access_order.pop_front() {
                if self.entries.remove(&oldest_key).is_some() {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
            } else {
                break;
            }
        }
    }
}

impl Default for ReviewCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Counter snapshot
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub stale_hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub invalidations: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Stale hits still serve content, so they count toward the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits + self.stale_hits;
        if hits + self.misses == 0 {
            0.0
        } else {
            hits as f64 / (hits + self.misses) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reviewkit_core::ProviderKind;

    fn key(id: &str) -> ReviewKey {
        ReviewKey::new(id, ProviderKind::Therapist)
    }

    fn review(id: &str) -> RealReview {
        RealReview {
            id: id.to_string(),
            provider_id: "abc".to_string(),
            kind: ProviderKind::Therapist,
            rating: 5,
            text: format!("review {}", id),
            reviewer_name: "Sarah".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    fn small_cache(max_entries: usize, staleness: Duration) -> ReviewCache {
        ReviewCache::new(CacheConfig {
            max_entries,
            staleness_threshold: staleness,
        })
    }

    #[test]
    fn set_then_get_is_fresh() {
        let cache = ReviewCache::default();
        cache.set(key("abc"), vec![review("r1"), review("r2")]);

        let hit = cache.get(&key("abc")).unwrap();
        assert!(hit.is_fresh());
        assert_eq!(hit.reviews.len(), 2);
        assert_eq!(hit.reviews[0].id, "r1");
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache = ReviewCache::default();
        assert!(cache.get(&key("nobody")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn stale_entries_are_served_not_dropped() {
        let cache = small_cache(16, Duration::from_millis(10));
        cache.set(key("abc"), vec![review("r1")]);

        std::thread::sleep(Duration::from_millis(20));

        let hit = cache.get(&key("abc")).unwrap();
        assert_eq!(hit.freshness, Freshness::Stale);
        assert_eq!(hit.reviews[0].id, "r1");
        assert!(hit.age >= Duration::from_millis(10));
        // still present for the next reader
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().stale_hits, 1);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = small_cache(3, Duration::from_secs(60));
        cache.set(key("a"), vec![review("r1")]);
        cache.set(key("b"), vec![review("r2")]);
        cache.set(key("c"), vec![review("r3")]);
        cache.set(key("d"), vec![review("r4")]);

        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("d")).is_some());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn reads_refresh_lru_position() {
        let cache = small_cache(2, Duration::from_secs(60));
        cache.set(key("a"), vec![review("r1")]);
        cache.set(key("b"), vec![review("r2")]);

        // touch "a" so "b" becomes the eviction candidate
        cache.get(&key("a"));
        cache.set(key("c"), vec![review("r3")]);

        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn set_replaces_entry_whole() {
        let cache = ReviewCache::default();
        cache.set(key("abc"), vec![review("r1")]);
        cache.set(key("abc"), vec![review("r2"), review("r3")]);

        let hit = cache.get(&key("abc")).unwrap();
        assert_eq!(hit.reviews.len(), 2);
        assert_eq!(hit.reviews[0].id, "r2");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn replacing_at_capacity_keeps_other_entries() {
        let cache = small_cache(2, Duration::from_secs(60));
        cache.set(key("a"), vec![review("r1")]);
        cache.set(key("b"), vec![review("r2")]);
        cache.set(key("a"), vec![review("r9")]);

        assert!(cache.get(&key("b")).is_some());
        assert_eq!(cache.get(&key("a")).unwrap().reviews[0].id, "r9");
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache = ReviewCache::default();
        cache.set(key("abc"), vec![review("r1")]);

        assert!(cache.invalidate(&key("abc")));
        assert!(cache.get(&key("abc")).is_none());
        assert!(!cache.invalidate(&key("abc")));
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn clear_empties_everything() {
        let cache = ReviewCache::default();
        cache.set(key("a"), vec![review("r1")]);
        cache.set(key("b"), vec![review("r2")]);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&key("a")).is_none());
    }

    #[test]
    fn hit_rate_counts_stale_hits() {
        let cache = small_cache(16, Duration::from_millis(5));
        cache.set(key("abc"), vec![review("r1")]);
        cache.get(&key("abc")); // fresh hit
        std::thread::sleep(Duration::from_millis(10));
        cache.get(&key("abc")); // stale hit
        cache.get(&key("other")); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stale_hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }
}
