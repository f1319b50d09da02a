//! Real-time quote type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag carried by quotes and bar series produced by the terminal
/// synthetic fallback, so callers can always tell generated data from real.
pub const SOURCE_SYNTHETIC: &str = "synthetic";

/// A snapshot quote for one symbol.
///
/// Immutable once constructed; a refetch produces a new `Quote` that
/// supersedes this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// Previous session close
    pub previous_close: f64,
    /// Absolute change from previous close
    pub change: f64,
    /// Percent change from previous close
    pub change_percent: f64,
    /// Session volume
    pub volume: f64,
    /// 20-session average volume, 0 when the provider does not report it
    pub average_volume: f64,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Identifier of the adapter that produced this quote
    pub source_id: String,
}

impl Quote {
    /// Build a quote, deriving change fields from price and previous close.
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        previous_close: f64,
        volume: f64,
        timestamp: i64,
        source_id: impl Into<String>,
    ) -> Self {
        let change = price - previous_close;
        let change_percent = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };
        Self {
            symbol: symbol.into(),
            price,
            previous_close,
            change,
            change_percent,
            volume,
            average_volume: 0.0,
            timestamp,
            source_id: source_id.into(),
        }
    }

    /// Set the average volume reported by the provider.
    pub fn with_average_volume(mut self, average_volume: f64) -> Self {
        self.average_volume = average_volume;
        self
    }

    /// True when this quote came from the synthetic fallback.
    pub fn is_synthetic(&self) -> bool {
        self.source_id == SOURCE_SYNTHETIC
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_fields_derived() {
        let q = Quote::new("AAPL", 102.0, 100.0, 1_000_000.0, 1_700_000_000_000, "delayed");
        assert!((q.change - 2.0).abs() < 1e-9);
        assert!((q.change_percent - 2.0).abs() < 1e-9);
        assert!(!q.is_synthetic());
    }

    #[test]
    fn test_zero_previous_close() {
        let q = Quote::new("AAPL", 102.0, 0.0, 0.0, 0, SOURCE_SYNTHETIC);
        assert_eq!(q.change_percent, 0.0);
        assert!(q.is_synthetic());
    }
}
