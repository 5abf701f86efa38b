//! Hybrid review resolution: cached real reviews blended with deterministic
//! synthetic filler so every provider profile always shows a populated,
//! non-flickering list.

pub mod cache;
pub mod resolver;
pub mod seed;

pub use cache::{CacheHit, CacheStats, Freshness, ReviewCache};
pub use resolver::{HybridResolver, Resolution, ResolveOptions};
pub use seed::SeedGenerator;
