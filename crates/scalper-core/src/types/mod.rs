//! Canonical data types.

mod account;
mod indicators;
mod interval;
mod ohlcv;
mod quote;
mod score;

pub use account::AccountState;
pub use indicators::IndicatorSet;
pub use interval::Interval;
pub use ohlcv::{Bar, BarSeries};
pub use quote::{Quote, SOURCE_SYNTHETIC};
pub use score::{ScoreComponents, ScoreRecord, SignalDirection};
