//! Scoring configuration.

use scalper_core::{ScalperError, ScalperResult};
use serde::{Deserialize, Serialize};

/// Sub-score weights. The portion of 1.0 not covered by the four
/// sub-scores is reserved for an optional sentiment input; when none is
/// wired in it simply contributes nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub volatility: f64,
    pub momentum: f64,
    pub trend: f64,
    pub volume: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            volatility: 0.25,
            momentum: 0.25,
            trend: 0.20,
            volume: 0.15,
        }
    }
}

impl ScoreWeights {
    /// Fail fast on deployment mistakes: negative weights or a total
    /// above 1.0.
    pub fn validate(&self) -> ScalperResult<()> {
        let all = [self.volatility, self.momentum, self.trend, self.volume];
        if all.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(ScalperError::Config(
                "score weights must be non-negative finite numbers".into(),
            ));
        }
        let total: f64 = all.iter().sum();
        if total > 1.0 + 1e-9 {
            return Err(ScalperError::Config(format!(
                "score weights sum to {total:.3}, must not exceed 1.0"
            )));
        }
        Ok(())
    }
}

/// Credit curve for the momentum sub-score, applied to the magnitude of
/// the 20-bar percent change. Moves beyond `partial_hi` are treated as
/// unsustainable and earn only `overextended_credit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumCurve {
    /// Lower edge of the full-credit band, percent
    pub full_lo: f64,
    /// Upper edge of the full-credit band, percent
    pub full_hi: f64,
    /// Upper edge of the partial-credit band, percent
    pub partial_hi: f64,
    /// Credit for magnitudes below `full_lo`
    pub quiet_credit: f64,
    /// Credit inside (full_hi, partial_hi]
    pub partial_credit: f64,
    /// Credit beyond `partial_hi`
    pub overextended_credit: f64,
}

impl Default for MomentumCurve {
    fn default() -> Self {
        Self {
            full_lo: 5.0,
            full_hi: 25.0,
            partial_hi: 30.0,
            quiet_credit: 0.3,
            partial_credit: 0.6,
            overextended_credit: 0.2,
        }
    }
}

impl MomentumCurve {
    pub fn validate(&self) -> ScalperResult<()> {
        if !(self.full_lo < self.full_hi && self.full_hi < self.partial_hi) {
            return Err(ScalperError::Config(
                "momentum curve edges must be strictly increasing".into(),
            ));
        }
        let credits = [self.quiet_credit, self.partial_credit, self.overextended_credit];
        if credits.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ScalperError::Config(
                "momentum credits must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Credit in [0, 1] for a signed percent change.
    pub fn credit(&self, change_pct: f64) -> f64 {
        let magnitude = change_pct.abs();
        if magnitude < self.full_lo {
            self.quiet_credit
        } else if magnitude <= self.full_hi {
            1.0
        } else if magnitude <= self.partial_hi {
            self.partial_credit
        } else {
            self.overextended_credit
        }
    }
}

/// Thresholds for turning a score into a direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Minimum overall score for a buy
    pub buy_min: f64,
    /// Maximum overall score for a sell
    pub sell_max: f64,
    /// RSI below this counts as a bullish (oversold) vote
    pub rsi_bullish_below: f64,
    /// RSI above this counts as a bearish (overbought) vote
    pub rsi_bearish_above: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            buy_min: 70.0,
            sell_max: 30.0,
            rsi_bullish_below: 40.0,
            rsi_bearish_above: 60.0,
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> ScalperResult<()> {
        if self.sell_max >= self.buy_min {
            return Err(ScalperError::Config(
                "sell_max must be below buy_min".into(),
            ));
        }
        if self.rsi_bullish_below >= self.rsi_bearish_above {
            return Err(ScalperError::Config(
                "rsi_bullish_below must be below rsi_bearish_above".into(),
            ));
        }
        Ok(())
    }
}
