//! The provider fallback chain.

use std::sync::Arc;
use std::time::Duration;

use scalper_core::{BarSeries, Interval, MarketDataSource, Quote};
use tracing::{debug, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::rate_limit::RateLimiter;
use crate::sources::synthetic::SyntheticSource;

/// Walks an ordered provider list until one answers, caching real
/// results and falling back to synthetic data when every provider fails.
///
/// `get_quote`/`get_bars` are total: they always produce a value. The
/// only way to tell a degraded answer from a real one is the
/// `source_id` tag, which is the point.
pub struct DataRouter {
    sources: Vec<Arc<dyn MarketDataSource>>,
    limiter: RateLimiter,
    synthetic: SyntheticSource,
    quote_cache: TtlCache<Quote>,
    bars_cache: TtlCache<BarSeries>,
}

impl DataRouter {
    pub fn new(
        sources: Vec<Arc<dyn MarketDataSource>>,
        limiter: RateLimiter,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            sources,
            limiter,
            synthetic: SyntheticSource::new(),
            quote_cache: TtlCache::new(cache_ttl),
            bars_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Latest quote for a symbol. Never fails; the worst case is a
    /// synthetic quote.
    pub async fn get_quote(&self, symbol: &str) -> Quote {
        // Cache keys are provider-independent: a hit short-circuits the
        // whole chain, not one tier of it.
        let key = format!("quote/{symbol}");
        if let Some(quote) = self.quote_cache.get(&key) {
            debug!(symbol, "quote cache hit");
            return quote;
        }

        for source in &self.sources {
            self.limiter.acquire(source.id()).await;
            match source.fetch_quote(symbol).await {
                Ok(quote) if quote.price > 0.0 => {
                    self.quote_cache.insert(key, quote.clone());
                    return quote;
                }
                Ok(_) => {
                    warn!(symbol, source = source.id(), "provider returned a zero-price quote");
                }
                Err(e) => {
                    warn!(symbol, source = source.id(), error = %e, "quote fetch failed");
                }
            }
        }

        warn!(symbol, "all providers failed, serving synthetic quote");
        self.synthetic.quote(symbol)
    }

    /// Bar history for a symbol. Never fails; the worst case is a
    /// synthetic series.
    pub async fn get_bars(&self, symbol: &str, interval: Interval, period_days: u32) -> BarSeries {
        let key = format!("bars/{symbol}/{interval}/{period_days}");
        if let Some(series) = self.bars_cache.get(&key) {
            debug!(symbol, "bars cache hit");
            return series;
        }

        for source in &self.sources {
            self.limiter.acquire(source.id()).await;
            match source.fetch_bars(symbol, interval, period_days).await {
                Ok(bars) if !bars.is_empty() => {
                    let series = BarSeries::from_bars(symbol, interval, source.id(), bars);
                    self.bars_cache.insert(key, series.clone());
                    return series;
                }
                Ok(_) => {
                    warn!(symbol, source = source.id(), "provider returned no bars");
                }
                Err(e) => {
                    warn!(symbol, source = source.id(), error = %e, "bars fetch failed");
                }
            }
        }

        warn!(symbol, "all providers failed, serving synthetic bars");
        let bars = self.synthetic.bars(symbol, interval, period_days);
        BarSeries::from_bars(symbol, interval, self.synthetic.id(), bars)
    }

    pub fn clear_cache(&self) {
        self.quote_cache.clear();
        self.bars_cache.clear();
    }

    /// (quote cache, bars cache) counters.
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.quote_cache.stats(), self.bars_cache.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scalper_core::{Bar, DataError, SOURCE_SYNTHETIC};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; answers or fails per construction.
    struct FakeSource {
        id: &'static str,
        fail: bool,
        quote_calls: AtomicUsize,
        bars_calls: AtomicUsize,
    }

    impl FakeSource {
        fn working(id: &'static str) -> Self {
            Self {
                id,
                fail: false,
                quote_calls: AtomicUsize::new(0),
                bars_calls: AtomicUsize::new(0),
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::working(id)
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataError::Network {
                    source_id: self.id.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(Quote::new(symbol, 100.0, 99.0, 1_000_000.0, 0, self.id))
        }

        async fn fetch_bars(
            &self,
            _symbol: &str,
            _interval: Interval,
            _period_days: u32,
        ) -> Result<Vec<Bar>, DataError> {
            self.bars_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataError::Network {
                    source_id: self.id.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(vec![Bar::new(0, 100.0, 101.0, 99.0, 100.5, 1000.0)])
        }

        fn id(&self) -> &str {
            self.id
        }
    }

    fn limiter() -> RateLimiter {
        RateLimiter::new(Duration::from_millis(1)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_all_adapters() {
        let source = Arc::new(FakeSource::working("primary"));
        let router = DataRouter::new(
            vec![source.clone()],
            limiter(),
            Duration::from_secs(30),
        );

        let first = router.get_quote("AAPL").await;
        let second = router.get_quote("AAPL").await;

        assert_eq!(first, second);
        assert_eq!(source.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_walks_chain_in_order() {
        let bad = Arc::new(FakeSource::failing("primary"));
        let good = Arc::new(FakeSource::working("secondary"));
        let router = DataRouter::new(
            vec![bad.clone(), good.clone()],
            limiter(),
            Duration::from_secs(30),
        );

        let quote = router.get_quote("AAPL").await;
        assert_eq!(quote.source_id, "secondary");
        assert_eq!(bad.quote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(good.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_yield_synthetic() {
        let bad1 = Arc::new(FakeSource::failing("primary"));
        let bad2 = Arc::new(FakeSource::failing("secondary"));
        let router = DataRouter::new(
            vec![bad1, bad2],
            limiter(),
            Duration::from_secs(30),
        );

        let quote = router.get_quote("AAPL").await;
        assert_eq!(quote.source_id, SOURCE_SYNTHETIC);
        assert!(quote.price > 0.0);

        let series = router.get_bars("AAPL", Interval::FiveMinutes, 2).await;
        assert_eq!(series.source_id, SOURCE_SYNTHETIC);
        assert!(!series.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthetic_results_are_not_cached() {
        let bad = Arc::new(FakeSource::failing("primary"));
        let router = DataRouter::new(vec![bad.clone()], limiter(), Duration::from_secs(30));

        router.get_quote("AAPL").await;
        router.get_quote("AAPL").await;

        // No cache entry was written, so the chain was walked both times.
        assert_eq!(bad.quote_calls.load(Ordering::SeqCst), 2);
        let (quote_stats, _) = router.cache_stats();
        assert_eq!(quote_stats.entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bars_cache_round_trip() {
        let source = Arc::new(FakeSource::working("primary"));
        let router = DataRouter::new(
            vec![source.clone()],
            limiter(),
            Duration::from_secs(30),
        );

        let first = router.get_bars("AAPL", Interval::OneMinute, 1).await;
        let second = router.get_bars("AAPL", Interval::OneMinute, 1).await;
        assert_eq!(first, second);
        assert_eq!(source.bars_calls.load(Ordering::SeqCst), 1);

        // A different request shape is a different key.
        router.get_bars("AAPL", Interval::FiveMinutes, 1).await;
        assert_eq!(source.bars_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let source = Arc::new(FakeSource::working("primary"));
        let router = DataRouter::new(
            vec![source.clone()],
            limiter(),
            Duration::from_secs(30),
        );

        router.get_quote("AAPL").await;
        tokio::time::advance(Duration::from_secs(31)).await;
        router.get_quote("AAPL").await;

        assert_eq!(source.quote_calls.load(Ordering::SeqCst), 2);
    }
}
