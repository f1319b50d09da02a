//! Core types and traits for the scalping screener.
//!
//! This crate provides the foundational building blocks including:
//! - Canonical market data types (Quote, Bar, BarSeries)
//! - Derived analysis types (IndicatorSet, ScoreRecord)
//! - Account state for risk gating
//! - The market data source capability trait

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, ScalperError, ScalperResult};
pub use traits::*;
pub use types::*;
