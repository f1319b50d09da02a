//! Scalping score computation and ranking.
//!
//! Collapses an `IndicatorSet` + `Quote` pair into a single comparable
//! score with four named sub-scores, and ranks batches of records. The
//! numeric thresholds here (momentum credit curve, saturation points,
//! direction thresholds) are tuned heuristics, kept configurable rather
//! than asserted as optimal.

mod engine;
mod weights;

pub use engine::ScoringEngine;
pub use weights::{MomentumCurve, ScoreWeights, SignalThresholds};
