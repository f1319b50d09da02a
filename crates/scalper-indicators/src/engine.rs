//! The indicator engine.

use scalper_core::{BarSeries, IndicatorSet};
use serde::{Deserialize, Serialize};

use crate::math;

/// Indicator lookback periods.
///
/// The defaults are the standard parameterizations named in the indicator
/// literature; they are configurable but rarely changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub bollinger: usize,
    pub bollinger_sigma: f64,
    pub atr: usize,
    pub volume_window: usize,
    pub momentum_window: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_short: 20,
            sma_long: 50,
            ema_fast: 12,
            ema_slow: 26,
            bollinger: 20,
            bollinger_sigma: 2.0,
            atr: 14,
            volume_window: 20,
            momentum_window: 20,
        }
    }
}

/// Pure indicator computation over a bar series.
///
/// # Minimum history
///
/// | field | needs | neutral default |
/// |---|---|---|
/// | rsi | rsi period + 1 | 50.0 |
/// | macd / signal / histogram | slow + signal | 0.0 |
/// | sma20 / sma50 / ema12 / ema26 | their period | last close |
/// | bb_* | bollinger period | last close, width 0 |
/// | atr | atr period + 1 | 0.0 |
/// | vwap | 1 bar with volume | last close |
/// | volume_ratio | volume window | 1.0 |
/// | price_change_pct | momentum window + 1 | 0.0 |
///
/// An empty series yields `IndicatorSet::neutral(0.0)`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    periods: IndicatorPeriods,
}

impl IndicatorEngine {
    pub fn new(periods: IndicatorPeriods) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &IndicatorPeriods {
        &self.periods
    }

    /// Compute the full indicator set for a series. Deterministic; never
    /// produces NaN or infinity.
    pub fn compute(&self, series: &BarSeries) -> IndicatorSet {
        let current_price = series.last().map(|b| b.close).unwrap_or(0.0);
        let mut set = IndicatorSet::neutral(current_price);
        if series.is_empty() {
            return set;
        }

        let p = &self.periods;
        let closes = series.closes();
        let volumes = series.volumes();
        let bars = series.bars();

        if let Some(value) = math::rsi(&closes, p.rsi) {
            set.rsi = value;
        }
        if let Some(value) = math::macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal) {
            set.macd = value.macd;
            set.macd_signal = value.signal;
            set.macd_histogram = value.histogram;
        }
        if let Some(value) = math::sma(&closes, p.sma_short) {
            set.sma20 = value;
        }
        if let Some(value) = math::sma(&closes, p.sma_long) {
            set.sma50 = value;
        }
        if let Some(value) = math::ema(&closes, p.ema_fast) {
            set.ema12 = value;
        }
        if let Some(value) = math::ema(&closes, p.ema_slow) {
            set.ema26 = value;
        }
        if let Some(bands) = math::bollinger(&closes, p.bollinger, p.bollinger_sigma) {
            set.bb_upper = bands.upper;
            set.bb_middle = bands.middle;
            set.bb_lower = bands.lower;
            set.bb_width = bands.width;
        }
        if let Some(value) = math::atr(bars, p.atr) {
            set.atr = value;
        }
        if let Some(value) = math::session_vwap(bars) {
            set.vwap = value;
        }
        if let Some(value) = math::volume_ratio(&volumes, p.volume_window) {
            set.volume_ratio = value;
        }
        if let Some(value) = math::price_change_pct(&closes, p.momentum_window) {
            set.price_change_pct = value;
        }

        set
    }
}
