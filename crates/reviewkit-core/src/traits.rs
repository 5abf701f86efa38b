use crate::{RealReview, Result, ReviewKey};
use async_trait::async_trait;

/// Seam to the remote review backend. Implementations return only
/// moderator-approved reviews, in a stable order absent new writes.
/// Submission and moderation live outside this layer; callers that write
/// through some other channel are expected to invalidate the cache.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_by_provider(&self, key: &ReviewKey) -> Result<Vec<RealReview>>;
}
