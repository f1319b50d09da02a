//! Technical indicator engine.
//!
//! Pure computation: a `BarSeries` in, an `IndicatorSet` out. No I/O, no
//! side effects, deterministic for identical input. Indicators follow the
//! standard definitions (Wilder RSI, EMA-based MACD, Bollinger with
//! population standard deviation, Wilder ATR, session VWAP); where the
//! series is shorter than an indicator needs, the engine substitutes that
//! indicator's neutral default so downstream scoring never sees NaN.

pub mod engine;
pub mod math;

pub use engine::{IndicatorEngine, IndicatorPeriods};
