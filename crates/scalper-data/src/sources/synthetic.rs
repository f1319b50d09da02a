//! Deterministic synthetic data, the terminal fallback.
//!
//! Seeded by symbol so every call produces the same prices, letting the
//! rest of the pipeline keep running through provider outages and market
//! closure. Output is always tagged `synthetic` and never cached as real.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scalper_core::{Bar, DataError, Interval, MarketDataSource, Quote, SOURCE_SYNTHETIC};

/// Fixed anchor for generated bar timestamps, keeping bar output
/// identical across calls.
const BAR_EPOCH_MS: i64 = 1_700_000_000_000;
/// Upper bound on generated series length.
const MAX_BARS: usize = 500;

/// Seeded pseudo-random quote and bar generator.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    pub fn new() -> Self {
        Self
    }

    fn seed_for(symbol: &str, salt: impl Hash) -> u64 {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        salt.hash(&mut hasher);
        hasher.finish()
    }

    fn base_price(symbol: &str) -> f64 {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(symbol, "base"));
        rng.random_range(20.0..500.0)
    }

    fn bars_per_day(interval: Interval) -> usize {
        // A 390-minute regular session.
        match interval {
            Interval::OneMinute => 390,
            Interval::FiveMinutes => 78,
            Interval::FifteenMinutes => 26,
            Interval::OneHour => 7,
            Interval::Daily => 1,
        }
    }

    /// Generate a quote for `symbol`. Price fields are deterministic;
    /// only the timestamp reflects the wall clock.
    pub fn quote(&self, symbol: &str) -> Quote {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(symbol, "quote"));
        let base = Self::base_price(symbol);
        let price = base * rng.random_range(0.97..1.03);
        let previous_close = base * rng.random_range(0.97..1.03);
        let volume = rng.random_range(100_000.0..5_000_000.0_f64).round();
        let average_volume = rng.random_range(100_000.0..5_000_000.0_f64).round();

        Quote::new(
            symbol,
            price,
            previous_close,
            volume,
            Utc::now().timestamp_millis(),
            SOURCE_SYNTHETIC,
        )
        .with_average_volume(average_volume)
    }

    /// Generate a bounded random walk of bars, identical for identical
    /// arguments.
    pub fn bars(&self, symbol: &str, interval: Interval, period_days: u32) -> Vec<Bar> {
        let count = (period_days as usize * Self::bars_per_day(interval)).clamp(1, MAX_BARS);
        let mut rng =
            StdRng::seed_from_u64(Self::seed_for(symbol, (interval.as_str(), period_days)));

        let base = Self::base_price(symbol);
        let floor = base * 0.7;
        let ceiling = base * 1.3;
        let step_ms = interval.seconds() * 1000;

        let mut close = base;
        let mut bars = Vec::with_capacity(count);
        for i in 0..count {
            let open = close;
            close = (open * rng.random_range(0.995..1.005)).clamp(floor, ceiling);
            let high = open.max(close) * rng.random_range(1.0..1.003);
            let low = open.min(close) * rng.random_range(0.997..1.0);
            let volume = rng.random_range(100_000.0..2_000_000.0_f64).round();

            let timestamp = BAR_EPOCH_MS + (i as i64 - count as i64) * step_ms;
            bars.push(Bar::new(timestamp, open, high, low, close, volume));
        }
        bars
    }
}

#[async_trait]
impl MarketDataSource for SyntheticSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        Ok(self.quote(symbol))
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        period_days: u32,
    ) -> Result<Vec<Bar>, DataError> {
        Ok(self.bars(symbol, interval, period_days))
    }

    fn id(&self) -> &str {
        SOURCE_SYNTHETIC
    }
}
