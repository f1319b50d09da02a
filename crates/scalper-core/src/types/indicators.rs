//! Derived indicator snapshot.

use serde::{Deserialize, Serialize};

/// All indicators for one (symbol, series) pair, evaluated at the last bar.
///
/// Every field is a finite number: where the series is too short for an
/// indicator, the engine substitutes that indicator's documented neutral
/// default instead of letting NaN propagate (see `scalper-indicators`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Wilder RSI(14)
    pub rsi: f64,
    /// MACD line (EMA12 - EMA26)
    pub macd: f64,
    /// Signal line (EMA9 of MACD)
    pub macd_signal: f64,
    /// MACD histogram (MACD - signal)
    pub macd_histogram: f64,
    /// 20-bar simple moving average
    pub sma20: f64,
    /// 50-bar simple moving average
    pub sma50: f64,
    /// 12-bar exponential moving average
    pub ema12: f64,
    /// 26-bar exponential moving average
    pub ema26: f64,
    /// Upper Bollinger band (20, 2 sigma)
    pub bb_upper: f64,
    /// Middle Bollinger band (SMA20)
    pub bb_middle: f64,
    /// Lower Bollinger band
    pub bb_lower: f64,
    /// Band width ((upper - lower) / middle)
    pub bb_width: f64,
    /// Average true range (14)
    pub atr: f64,
    /// Session VWAP (cumulative typical price x volume / cumulative volume)
    pub vwap: f64,
    /// Last volume / 20-bar average volume
    pub volume_ratio: f64,
    /// Signed percent change between the last close and the close 20 bars earlier
    pub price_change_pct: f64,
    /// Last close of the series
    pub current_price: f64,
}

impl IndicatorSet {
    /// The all-neutral set for a series evaluated at `price`: what every
    /// indicator defaults to when no history is available.
    pub fn neutral(price: f64) -> Self {
        Self {
            rsi: 50.0,
            macd: 0.0,
            macd_signal: 0.0,
            macd_histogram: 0.0,
            sma20: price,
            sma50: price,
            ema12: price,
            ema26: price,
            bb_upper: price,
            bb_middle: price,
            bb_lower: price,
            bb_width: 0.0,
            atr: 0.0,
            vwap: price,
            volume_ratio: 1.0,
            price_change_pct: 0.0,
            current_price: price,
        }
    }

    /// True when every field is finite. The engine upholds this; tests
    /// assert it.
    pub fn is_finite(&self) -> bool {
        [
            self.rsi,
            self.macd,
            self.macd_signal,
            self.macd_histogram,
            self.sma20,
            self.sma50,
            self.ema12,
            self.ema26,
            self.bb_upper,
            self.bb_middle,
            self.bb_lower,
            self.bb_width,
            self.atr,
            self.vwap,
            self.volume_ratio,
            self.price_change_pct,
            self.current_price,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
