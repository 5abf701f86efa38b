use std::time::Duration;

/// Review cache tuning.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry count bound; the least recently used entry is evicted beyond it.
    pub max_entries: usize,
    /// Entries older than this are served as stale and refreshed in the
    /// background instead of being dropped.
    pub staleness_threshold: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            staleness_threshold: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Synthetic review generation tuning.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Width of the rotation window; content is stable inside one window.
    pub bucket_period: Duration,
    /// Synthetic timestamps are backdated up to this many days.
    pub backdate_window_days: u64,
    /// Probability of a five-star synthetic rating, remainder is four stars.
    pub five_star_weight: f32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            bucket_period: Duration::from_secs(300), // 5 minutes
            backdate_window_days: 60,
            five_star_weight: 0.8,
        }
    }
}

/// Resolution policy.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Display list size every resolution tops up to.
    pub target_count: usize,
    /// Budget for a synchronous or background store fetch; expiry counts as
    /// a fetch failure.
    pub fetch_timeout: Duration,
    pub seeds: SeedConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            target_count: 5,
            fetch_timeout: Duration::from_secs(10),
            seeds: SeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_display_policy() {
        let config = ResolverConfig::default();
        assert_eq!(config.target_count, 5);
        assert_eq!(config.seeds.bucket_period, Duration::from_secs(300));
        assert_eq!(config.seeds.backdate_window_days, 60);

        let cache = CacheConfig::default();
        assert_eq!(cache.staleness_threshold, Duration::from_secs(300));
        assert!(cache.max_entries > 0);
    }
}
