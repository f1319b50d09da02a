//! Score computation and batch ranking.

use scalper_core::{
    IndicatorSet, Quote, ScalperResult, ScoreComponents, ScoreRecord, SignalDirection,
};
use tracing::debug;

use crate::weights::{MomentumCurve, ScoreWeights, SignalThresholds};

/// ATR as a fraction of price at which the volatility sub-score saturates.
const ATR_RATIO_SATURATION: f64 = 0.02;
/// Bollinger width at which the volatility sub-score saturates.
const BB_WIDTH_SATURATION: f64 = 0.04;
/// Displacement from SMA20 (fraction of SMA20) at which trend strength
/// saturates.
const TREND_DISPLACEMENT_SATURATION: f64 = 0.01;
/// Alignment factor applied when price side and EMA crossover disagree.
const TREND_MIXED_ALIGNMENT: f64 = 0.4;
/// Volume ratio at which the volume sub-score saturates.
const VOLUME_RATIO_CAP: f64 = 2.0;

/// Turns an indicator set and quote into a ranked, directional score.
///
/// Scoring is pure and deterministic: the same inputs always yield the
/// same record.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoreWeights,
    curve: MomentumCurve,
    thresholds: SignalThresholds,
}

impl ScoringEngine {
    /// Build an engine, rejecting invalid configuration up front.
    pub fn new(
        weights: ScoreWeights,
        curve: MomentumCurve,
        thresholds: SignalThresholds,
    ) -> ScalperResult<Self> {
        weights.validate()?;
        curve.validate()?;
        thresholds.validate()?;
        Ok(Self {
            weights,
            curve,
            thresholds,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: ScoreWeights::default(),
            curve: MomentumCurve::default(),
            thresholds: SignalThresholds::default(),
        }
    }

    /// Score one symbol from its indicators and latest quote.
    pub fn score(&self, indicators: &IndicatorSet, quote: &Quote) -> ScoreRecord {
        let components = ScoreComponents {
            volatility: self.volatility_score(indicators),
            momentum: self.momentum_score(indicators),
            trend: self.trend_score(indicators),
            volume: self.volume_score(indicators),
        };

        let overall_score = (self.weights.volatility * components.volatility
            + self.weights.momentum * components.momentum
            + self.weights.trend * components.trend
            + self.weights.volume * components.volume)
            .clamp(0.0, 100.0);

        let direction = self.direction(indicators, overall_score);

        debug!(
            symbol = %quote.symbol,
            overall = overall_score,
            direction = %direction,
            "scored symbol"
        );

        ScoreRecord {
            symbol: quote.symbol.clone(),
            overall_score,
            direction,
            components,
            current_price: quote.price,
            timestamp: quote.timestamp,
        }
    }

    /// Sort records best-first: descending overall score, ties broken by
    /// ascending symbol so repeated runs over identical data rank stably.
    pub fn rank_batch(&self, mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
        records.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        records
    }

    /// Volatility sub-score: half from ATR relative to price, half from
    /// Bollinger band width. A scalper wants range, so wider is better.
    fn volatility_score(&self, set: &IndicatorSet) -> f64 {
        if set.current_price <= 0.0 {
            return 0.0;
        }
        let atr_part = ((set.atr / set.current_price) / ATR_RATIO_SATURATION).clamp(0.0, 1.0);
        let width_part = (set.bb_width / BB_WIDTH_SATURATION).clamp(0.0, 1.0);
        (0.5 * atr_part + 0.5 * width_part) * 100.0
    }

    /// Momentum sub-score from the magnitude of the recent move. Direction
    /// is handled separately; a sharp drop is as tradeable as a sharp rise.
    fn momentum_score(&self, set: &IndicatorSet) -> f64 {
        self.curve.credit(set.price_change_pct) * 100.0
    }

    /// Trend sub-score: displacement from SMA20 scaled by whether the EMA
    /// crossover agrees with which side of the SMA price sits on.
    fn trend_score(&self, set: &IndicatorSet) -> f64 {
        if set.sma20 <= 0.0 {
            return 0.0;
        }
        let displacement = (set.current_price - set.sma20).abs() / set.sma20;
        let strength = (displacement / TREND_DISPLACEMENT_SATURATION).clamp(0.0, 1.0);

        let price_above = set.current_price > set.sma20;
        let emas_bullish = set.ema12 > set.ema26;
        let alignment = if price_above == emas_bullish {
            1.0
        } else {
            TREND_MIXED_ALIGNMENT
        };

        strength * alignment * 100.0
    }

    /// Volume sub-score: current volume relative to its recent average,
    /// saturating at twice the average.
    fn volume_score(&self, set: &IndicatorSet) -> f64 {
        set.volume_ratio.min(VOLUME_RATIO_CAP) / VOLUME_RATIO_CAP * 100.0
    }

    /// Direction from confirming votes. A buy needs a high overall score
    /// plus at least two bullish confirmations outnumbering the bearish
    /// ones; a sell is the mirror image.
    fn direction(&self, set: &IndicatorSet, overall: f64) -> SignalDirection {
        let mut bullish = 0u32;
        let mut bearish = 0u32;

        if set.rsi < self.thresholds.rsi_bullish_below {
            bullish += 1;
        } else if set.rsi > self.thresholds.rsi_bearish_above {
            bearish += 1;
        }

        if set.macd_histogram > 0.0 {
            bullish += 1;
        } else if set.macd_histogram < 0.0 {
            bearish += 1;
        }

        if set.current_price > set.vwap {
            bullish += 1;
        } else if set.current_price < set.vwap {
            bearish += 1;
        }

        if overall >= self.thresholds.buy_min && bullish >= 2 && bullish > bearish {
            SignalDirection::Buy
        } else if overall <= self.thresholds.sell_max && bearish >= 2 && bearish > bullish {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        }
    }
}
