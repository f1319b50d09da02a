//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Interval, SOURCE_SYNTHETIC};

/// Compact OHLCV bar. Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}

/// Ordered bar history for one (symbol, interval) pair.
///
/// Timestamps are strictly increasing; a refetch replaces the whole series
/// rather than mutating bars in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Interval of the bars
    pub interval: Interval,
    /// Identifier of the adapter that produced this series
    pub source_id: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty series.
    pub fn new(symbol: impl Into<String>, interval: Interval, source_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            source_id: source_id.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from fetched bars: sorts by timestamp and drops
    /// duplicates so the strictly-increasing invariant holds.
    pub fn from_bars(
        symbol: impl Into<String>,
        interval: Interval,
        source_id: impl Into<String>,
        mut bars: Vec<Bar>,
    ) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            interval,
            source_id: source_id.into(),
            bars,
        }
    }

    /// Append a bar. Returns false (and leaves the series untouched) if the
    /// timestamp does not advance past the last bar.
    pub fn push(&mut self, bar: Bar) -> bool {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return false;
            }
        }
        self.bars.push(bar);
        true
    }

    /// True when this series came from the synthetic fallback.
    pub fn is_synthetic(&self) -> bool {
        self.source_id == SOURCE_SYNTHETIC
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        // Without previous close
        assert!((bar.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates a gap
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_from_bars_sorts_and_dedups() {
        let bars = vec![
            Bar::new(3, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(2, 9.0, 9.0, 9.0, 9.0, 9.0),
        ];
        let series = BarSeries::from_bars("AAPL", Interval::OneMinute, "delayed", bars);

        assert_eq!(series.len(), 3);
        let ts: Vec<i64> = series.iter().map(|b| b.timestamp).collect();
        assert_eq!(ts, vec![1, 2, 3]);
    }

    #[test]
    fn test_push_rejects_stale_timestamp() {
        let mut series = BarSeries::new("AAPL", Interval::OneMinute, "delayed");
        assert!(series.push(Bar::new(10, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert!(!series.push(Bar::new(10, 2.0, 2.0, 2.0, 2.0, 2.0)));
        assert!(!series.push(Bar::new(5, 2.0, 2.0, 2.0, 2.0, 2.0)));
        assert!(series.push(Bar::new(11, 2.0, 2.0, 2.0, 2.0, 2.0)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_extractions() {
        let mut series = BarSeries::new("AAPL", Interval::OneMinute, "delayed");
        series.push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0));

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
    }
}
