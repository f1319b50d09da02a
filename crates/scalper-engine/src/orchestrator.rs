//! Per-cycle fan-out across the watch list.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use scalper_core::{AccountState, Interval, ScoreRecord};
use scalper_data::DataRouter;
use scalper_indicators::IndicatorEngine;
use scalper_risk::RiskGate;
use scalper_score::ScoringEngine;
use tracing::{debug, info, warn};

const DEFAULT_WORKERS: usize = 5;

/// Runs the fetch-compute-score pipeline for a whole watch list.
///
/// Concurrency is bounded by a worker pool so the upstream rate limits
/// hold across the batch, not just per call. Each symbol's pipeline is
/// sequential internally.
pub struct Orchestrator {
    router: Arc<DataRouter>,
    indicators: IndicatorEngine,
    scoring: ScoringEngine,
    risk: Arc<RiskGate>,
    interval: Interval,
    period_days: u32,
    workers: usize,
}

impl Orchestrator {
    pub fn new(
        router: Arc<DataRouter>,
        indicators: IndicatorEngine,
        scoring: ScoringEngine,
        risk: Arc<RiskGate>,
        interval: Interval,
        period_days: u32,
    ) -> Self {
        Self {
            router,
            indicators,
            scoring,
            risk,
            interval,
            period_days,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Rank the watch list, best opportunity first.
    ///
    /// The deadline bounds the whole batch: every symbol pipeline races
    /// the same cutoff, so the call returns partial results at the
    /// deadline instead of stacking per-symbol windows. Symbols that miss
    /// the cutoff, or whose series comes back empty, are dropped from the
    /// output; one bad symbol never blocks the batch. Actionable records
    /// the risk gate refuses are demoted to hold rather than dropped, so
    /// the ranking itself stays intact.
    pub async fn rank_watchlist(&self, symbols: &[String], deadline: Duration) -> Vec<ScoreRecord> {
        let cutoff = tokio::time::Instant::now() + deadline;
        let records: Vec<ScoreRecord> = stream::iter(symbols)
            .map(|symbol| async move {
                match tokio::time::timeout_at(cutoff, self.score_symbol(symbol)).await {
                    Ok(record) => record,
                    Err(_) => {
                        warn!(%symbol, "symbol pipeline missed the deadline, dropping");
                        None
                    }
                }
            })
            .buffer_unordered(self.workers)
            .filter_map(|record| async move { record })
            .collect()
            .await;

        let ranked = self.scoring.rank_batch(records);
        ranked
            .into_iter()
            .map(|record| self.apply_risk_gate(record))
            .collect()
    }

    async fn score_symbol(&self, symbol: &str) -> Option<ScoreRecord> {
        let series = self
            .router
            .get_bars(symbol, self.interval, self.period_days)
            .await;
        if series.is_empty() {
            warn!(symbol, "empty bar series, dropping symbol");
            return None;
        }

        let indicators = self.indicators.compute(&series);
        let quote = self.router.get_quote(symbol).await;
        let record = self.scoring.score(&indicators, &quote);
        debug!(
            symbol,
            score = record.overall_score,
            direction = %record.direction,
            source = %series.source_id,
            "symbol scored"
        );
        Some(record)
    }

    fn apply_risk_gate(&self, record: ScoreRecord) -> ScoreRecord {
        if !record.direction.is_actionable() {
            return record;
        }

        let price = Decimal::from_f64(record.current_price).unwrap_or_default();
        let (allowed, reason) = self
            .risk
            .check_trade_allowed(&record.symbol, Decimal::ONE, price);
        if allowed {
            record
        } else {
            info!(symbol = %record.symbol, reason, "risk gate demoted signal to hold");
            record.demoted()
        }
    }

    /// Snapshot of the gated account.
    pub fn account_status(&self) -> AccountState {
        self.risk.account_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use scalper_core::{Bar, DataError, MarketDataSource, Quote, SignalDirection};
    use scalper_data::RateLimiter;
    use scalper_risk::RiskConfig;
    use std::collections::HashMap;

    /// Serves canned fixtures per symbol.
    struct FixtureSource {
        bars: HashMap<String, Vec<Bar>>,
        delay: Duration,
    }

    impl FixtureSource {
        fn new(bars: HashMap<String, Vec<Bar>>) -> Self {
            Self {
                bars,
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl MarketDataSource for FixtureSource {
        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
            let bars = self.bars.get(symbol).ok_or_else(|| {
                DataError::SymbolNotFound(symbol.to_string())
            })?;
            let last = bars.last().ok_or_else(|| DataError::EmptyPayload {
                source_id: "fixture".to_string(),
                symbol: symbol.to_string(),
            })?;
            Ok(Quote::new(
                symbol,
                last.close,
                bars[0].close,
                last.volume,
                last.timestamp,
                "fixture",
            ))
        }

        async fn fetch_bars(
            &self,
            symbol: &str,
            _interval: Interval,
            _period_days: u32,
        ) -> Result<Vec<Bar>, DataError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.bars
                .get(symbol)
                .cloned()
                .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
        }

        fn id(&self) -> &str {
            "fixture"
        }
    }

    fn bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar::new(i as i64 * 60_000, open, high, low, close, volume)
    }

    /// Oversold bounce on heavy volume: a long flat base, a sharp slide,
    /// then a reclaim. Reads deeply oversold with price back above VWAP.
    fn oversold_bounce_bars() -> Vec<Bar> {
        let mut bars = Vec::new();
        let mut i = 0;
        for _ in 0..40 {
            bars.push(bar(i, 100.0, 100.0, 100.0, 100.0, 100_000.0));
            i += 1;
        }
        let mut close = 100.0;
        for _ in 0..13 {
            let open = close;
            close -= 1.0;
            bars.push(bar(i, open, close + 1.5, close - 1.0, close, 2_000_000.0));
            i += 1;
        }
        for _ in 0..8 {
            let open = close;
            close += 0.4;
            bars.push(bar(i, open, close + 0.5, close - 0.5, close, 30_000_000.0));
            i += 1;
        }
        bars
    }

    /// Overbought grind: a slow low-range climb fading on thin volume.
    fn overbought_fade_bars() -> Vec<Bar> {
        let mut bars = Vec::new();
        let mut i = 0;
        for _ in 0..10 {
            bars.push(bar(i, 300.0, 300.0, 300.0, 300.0, 1_000_000.0));
            i += 1;
        }
        let mut close = 300.0;
        for _ in 0..30 {
            let open = close;
            close += 0.15;
            bars.push(bar(i, open, close + 0.3, close - 0.3, close, 5_000_000.0));
            i += 1;
        }
        for _ in 0..6 {
            let open = close;
            close -= 0.1;
            bars.push(bar(i, open, close + 0.2, close - 0.2, close, 1_000_000.0));
            i += 1;
        }
        bars
    }

    fn fixtures() -> HashMap<String, Vec<Bar>> {
        HashMap::from([
            ("AAPL".to_string(), oversold_bounce_bars()),
            ("MSFT".to_string(), overbought_fade_bars()),
        ])
    }

    fn router_with(source: FixtureSource) -> Arc<DataRouter> {
        Arc::new(DataRouter::new(
            vec![Arc::new(source)],
            RateLimiter::new(Duration::from_millis(1)).unwrap(),
            Duration::from_secs(30),
        ))
    }

    fn orchestrator(router: Arc<DataRouter>, risk: RiskGate) -> Orchestrator {
        Orchestrator::new(
            router,
            IndicatorEngine::default(),
            ScoringEngine::with_defaults(),
            Arc::new(risk),
            Interval::OneMinute,
            1,
        )
    }

    fn funded_gate() -> RiskGate {
        RiskGate::new(RiskConfig::default(), dec!(100_000)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_ranking_and_directions() {
        let engine = orchestrator(router_with(FixtureSource::new(fixtures())), funded_gate());

        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let ranked = engine
            .rank_watchlist(&symbols, Duration::from_secs(10))
            .await;

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].symbol, "AAPL");
        assert_eq!(ranked[1].symbol, "MSFT");
        assert!(ranked[0].overall_score > ranked[1].overall_score);
        assert_eq!(ranked[0].direction, SignalDirection::Buy);
        assert_eq!(ranked[1].direction, SignalDirection::Sell);
    }

    #[tokio::test(start_paused = true)]
    async fn test_protection_demotes_but_keeps_ranking() {
        let gate = funded_gate();
        gate.update_balance(dec!(-80_000)); // trips protection
        let engine = orchestrator(router_with(FixtureSource::new(fixtures())), gate);

        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let ranked = engine
            .rank_watchlist(&symbols, Duration::from_secs(10))
            .await;

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].symbol, "AAPL");
        assert!(ranked.iter().all(|r| r.direction == SignalDirection::Hold));
        assert!(!engine.account_status().trading_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_pipeline_is_dropped_not_awaited() {
        let source = FixtureSource::new(fixtures()).with_delay(Duration::from_secs(60));
        let engine = orchestrator(router_with(source), funded_gate());

        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let ranked = engine
            .rank_watchlist(&symbols, Duration::from_secs(5))
            .await;

        assert!(ranked.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_the_batch_not_each_symbol() {
        // One worker and many slow symbols: the pipelines must all race
        // the same cutoff, not get a fresh window each.
        let source = FixtureSource::new(fixtures()).with_delay(Duration::from_secs(60));
        let engine =
            orchestrator(router_with(source), funded_gate()).with_workers(1);

        let symbols: Vec<String> = (0..10).map(|i| format!("SYM{i}")).collect();
        let start = tokio::time::Instant::now();
        let ranked = engine
            .rank_watchlist(&symbols, Duration::from_secs(5))
            .await;

        assert!(ranked.is_empty());
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_symbol_falls_back_without_blocking_batch() {
        let engine = orchestrator(router_with(FixtureSource::new(fixtures())), funded_gate());

        // The unknown symbol is served synthetically, so the batch still
        // produces a record per symbol.
        let symbols = vec!["AAPL".to_string(), "ZZZQ".to_string()];
        let ranked = engine
            .rank_watchlist(&symbols, Duration::from_secs(10))
            .await;

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().any(|r| r.symbol == "AAPL"));
        assert!(ranked.iter().any(|r| r.symbol == "ZZZQ"));
    }
}
