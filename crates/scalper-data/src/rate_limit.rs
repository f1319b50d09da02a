//! Per-source call pacing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scalper_core::{ScalperError, ScalperResult};
use tokio::time::Instant;

/// Enforces a minimum spacing between calls to each upstream source.
///
/// Each source has an independent cadence; pacing one source never
/// delays another. Blocked callers on the same source queue up in FIFO
/// order on that source's async mutex. `acquire` never errors, worst
/// case it sleeps.
pub struct RateLimiter {
    default_interval: Duration,
    intervals: HashMap<String, Duration>,
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Option<Instant>>>>>,
}

impl RateLimiter {
    pub fn new(default_interval: Duration) -> ScalperResult<Self> {
        if default_interval.is_zero() {
            return Err(ScalperError::Config(
                "rate limiter interval must be positive".into(),
            ));
        }
        Ok(Self {
            default_interval,
            intervals: HashMap::new(),
            slots: Mutex::new(HashMap::new()),
        })
    }

    /// Override the spacing for one source.
    pub fn with_interval(
        mut self,
        source_id: impl Into<String>,
        interval: Duration,
    ) -> ScalperResult<Self> {
        if interval.is_zero() {
            return Err(ScalperError::Config(
                "rate limiter interval must be positive".into(),
            ));
        }
        self.intervals.insert(source_id.into(), interval);
        Ok(self)
    }

    fn interval_for(&self, source_id: &str) -> Duration {
        self.intervals
            .get(source_id)
            .copied()
            .unwrap_or(self.default_interval)
    }

    fn slot_for(&self, source_id: &str) -> Arc<tokio::sync::Mutex<Option<Instant>>> {
        let mut slots = self.slots.lock().unwrap();
        slots
            .entry(source_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
            .clone()
    }

    /// Wait until a call to `source_id` is due, then claim the slot.
    pub async fn acquire(&self, source_id: &str) {
        let interval = self.interval_for(source_id);
        let slot = self.slot_for(source_id);

        let mut last = slot.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_call_waits_out_the_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(1)).unwrap();

        let start = Instant::now();
        limiter.acquire("yahoo").await;
        limiter.acquire("yahoo").await;

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_pace_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(1)).unwrap();
        limiter.acquire("yahoo").await;

        // A different source is not delayed by yahoo's cadence.
        let start = Instant::now();
        limiter.acquire("polygon").await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_source_override() {
        let limiter = RateLimiter::new(Duration::from_secs(1))
            .unwrap()
            .with_interval("polygon", Duration::from_millis(100))
            .unwrap();

        let start = Instant::now();
        limiter.acquire("polygon").await;
        limiter.acquire("polygon").await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(RateLimiter::new(Duration::ZERO).is_err());
        let limiter = RateLimiter::new(Duration::from_secs(1)).unwrap();
        assert!(limiter.with_interval("x", Duration::ZERO).is_err());
    }
}
