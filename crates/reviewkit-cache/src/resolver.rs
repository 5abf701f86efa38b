use crate::{ReviewCache, SeedGenerator};
use reviewkit_core::{
    DisplayReview, ProviderKind, RealReview, Result, ResolverConfig, ReviewKitError, ReviewKey,
    ReviewStore, ReviewSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Per-call resolution options.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Skip the cache read path and fetch synchronously.
    pub force_refresh: bool,
    /// Top the list up with synthetic reviews; `false` caps the real list at
    /// the target count without filler.
    pub include_seeds: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            include_seeds: true,
        }
    }
}

/// What a resolution hands back to the UI. Always populated; the fallback
/// chain inside [`HybridResolver::resolve`] absorbs every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub reviews: Vec<DisplayReview>,
    pub from_cache: bool,
    /// Whether the satisfying source held any real reviews at all,
    /// independent of how many seeds were appended.
    pub has_real_reviews: bool,
}

/// Orchestrates cache, remote store and seed generator into one display list.
///
/// Read paths per call: a fresh cache hit returns immediately; a stale hit
/// returns immediately too and refreshes behind the caller; a miss (or a
/// forced refresh) fetches synchronously under a timeout, falling back to
/// whatever cached page exists and finally to seed-only output. Real reviews
/// always precede seeds and the list is topped up to the configured target.
pub struct HybridResolver<S: ReviewStore + 'static> {
    store: Arc<S>,
    cache: Arc<ReviewCache>,
    generator: SeedGenerator,
    config: ResolverConfig,
}

impl<S: ReviewStore + 'static> HybridResolver<S> {
    pub fn new(store: Arc<S>, cache: Arc<ReviewCache>, config: ResolverConfig) -> Self {
        let generator = SeedGenerator::new(config.seeds.clone());
        Self {
            store,
            cache,
            generator,
            config,
        }
    }

    /// Resolves the display list for one provider. Total: never returns an
    /// error past this boundary, the worst case is an all-seed list.
    pub async fn resolve(
        &self,
        provider_id: &str,
        kind: ProviderKind,
        city: &str,
        options: ResolveOptions,
    ) -> Resolution {
        let key = ReviewKey::new(provider_id, kind);
        let hit = self.cache.get(&key);

        if !options.force_refresh {
            if let Some(ref hit) = hit {
                if hit.is_fresh() {
                    debug!(key = %key, age_ms = hit.age.as_millis() as u64, "serving fresh cache hit");
                    return Resolution {
                        reviews: self.blend(&key, city, &hit.reviews, options.include_seeds),
                        from_cache: true,
                        has_real_reviews: !hit.reviews.is_empty(),
                    };
                }

                // Stale-while-revalidate: the caller gets the old page now,
                // the next caller gets whatever this refresh lands.
                debug!(key = %key, age_ms = hit.age.as_millis() as u64, "serving stale hit, refreshing behind");
                self.spawn_refresh(key.clone());
                return Resolution {
                    reviews: self.blend(&key, city, &hit.reviews, options.include_seeds),
                    from_cache: true,
                    has_real_reviews: !hit.reviews.is_empty(),
                };
            }
        }

        match self.fetch(&key).await {
            Ok(reviews) => {
                self.cache.set(key.clone(), reviews.clone());
                debug!(key = %key, count = reviews.len(), "fetched and cached");
                Resolution {
                    reviews: self.blend(&key, city, &reviews, options.include_seeds),
                    from_cache: false,
                    has_real_reviews: !reviews.is_empty(),
                }
            }
            Err(e) => {
                warn!(key = %key, error = %e, "review fetch failed, falling back");
                match hit {
                    Some(hit) => Resolution {
                        reviews: self.blend(&key, city, &hit.reviews, options.include_seeds),
                        from_cache: true,
                        has_real_reviews: !hit.reviews.is_empty(),
                    },
                    None => Resolution {
                        reviews: self.blend(&key, city, &[], options.include_seeds),
                        from_cache: false,
                        has_real_reviews: false,
                    },
                }
            }
        }
    }

    /// Write-through cache bust, called after a successful review submission
    /// so the next read reflects it instead of a five-minute-old page.
    pub fn invalidate(&self, provider_id: &str, kind: ProviderKind) -> bool {
        let key = ReviewKey::new(provider_id, kind);
        let removed = self.cache.invalidate(&key);
        if removed {
            info!(key = %key, "cache entry invalidated");
        }
        removed
    }

    /// Aggregate rating figures for a provider, over the same list a
    /// [`resolve`](Self::resolve) with default options would display.
    pub async fn summary(
        &self,
        provider_id: &str,
        kind: ProviderKind,
        city: &str,
        include_seeds: bool,
    ) -> ReviewSummary {
        let resolution = self
            .resolve(provider_id, kind, city, ResolveOptions::default())
            .await;
        ReviewSummary::from_reviews(&resolution.reviews, include_seeds)
    }

    pub fn cache(&self) -> &ReviewCache {
        &self.cache
    }

    /// Real reviews first, up to the target; seeds top up the remainder.
    /// The generator is not consulted at all when real reviews suffice.
    fn blend(
        &self,
        key: &ReviewKey,
        city: &str,
        real: &[RealReview],
        include_seeds: bool,
    ) -> Vec<DisplayReview> {
        let target = self.config.target_count;
        let mut out: Vec<DisplayReview> = real
            .iter()
            .take(target)
            .cloned()
            .map(DisplayReview::from)
            .collect();

        if include_seeds && out.len() < target {
            let bucket = self.generator.current_bucket();
            let needed = target - out.len();
            out.extend(
                self.generator
                    .generate(key, city, needed, bucket)
                    .into_iter()
                    .map(DisplayReview::from),
            );
        }
        out
    }

    async fn fetch(&self, key: &ReviewKey) -> Result<Vec<RealReview>> {
        timeout(self.config.fetch_timeout, self.store.list_by_provider(key))
            .await
            .map_err(|_| {
                ReviewKitError::Timeout(format!(
                    "review fetch for {} exceeded {:?}",
                    key, self.config.fetch_timeout
                ))
            })?
    }

    /// Fire-and-forget refresh. Failures are logged and dropped: the caller
    /// already has a usable, if stale, answer. Concurrent refreshes for one
    /// key are allowed; whole-entry replacement makes last-writer-wins safe.
    fn spawn_refresh(&self, key: ReviewKey) {
        let store = Arc::clone(&self.store);
        let cache = Arc::clone(&self.cache);
        let fetch_timeout = self.config.fetch_timeout;

        tokio::spawn(async move {
            match timeout(fetch_timeout, store.list_by_provider(&key)).await {
                Ok(Ok(reviews)) => {
                    debug!(key = %key, count = reviews.len(), "background refresh complete");
                    cache.set(key, reviews);
                }
                Ok(Err(e)) => {
                    warn!(key = %key, error = %e, "background refresh failed");
                }
                Err(_) => {
                    warn!(key = %key, timeout = ?fetch_timeout, "background refresh timed out");
                }
            }
        });
    }
}
