//! Scalping score types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction suggested by a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Buy,
    Sell,
    Hold,
}

impl SignalDirection {
    /// True for directions that would place a trade.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalDirection::Hold)
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalDirection::Buy => "buy",
            SignalDirection::Sell => "sell",
            SignalDirection::Hold => "hold",
        };
        write!(f, "{s}")
    }
}

/// The four sub-scores, each normalized to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub volatility: f64,
    pub momentum: f64,
    pub trend: f64,
    pub volume: f64,
}

/// One symbol's scalping score for one cycle.
///
/// Derived from exactly one (IndicatorSet, Quote) pair; recomputed every
/// cycle, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub symbol: String,
    /// Weighted overall score in [0, 100]
    pub overall_score: f64,
    pub direction: SignalDirection,
    pub components: ScoreComponents,
    pub current_price: f64,
    /// Unix timestamp in milliseconds of the quote the score was built from
    pub timestamp: i64,
}

impl ScoreRecord {
    /// Demote an actionable record to hold, keeping everything else.
    pub fn demoted(mut self) -> Self {
        self.direction = SignalDirection::Hold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&SignalDirection::Buy).unwrap();
        assert_eq!(json, "\"buy\"");
    }

    #[test]
    fn test_actionable() {
        assert!(SignalDirection::Buy.is_actionable());
        assert!(SignalDirection::Sell.is_actionable());
        assert!(!SignalDirection::Hold.is_actionable());
    }
}
