//! Market data fetching.
//!
//! A [`DataRouter`] owns an ordered list of provider adapters and walks
//! them in priority order, backed by a TTL cache and a per-source rate
//! limiter. When every real provider fails the router falls back to a
//! deterministic synthetic generator, so fetches never fail outright.

pub mod cache;
pub mod rate_limit;
pub mod router;
pub mod sources;

pub use cache::{CacheStats, TtlCache};
pub use rate_limit::RateLimiter;
pub use router::DataRouter;
