//! Watch-list orchestration.
//!
//! Fans the per-symbol pipeline (bars, indicators, quote, score) across
//! a bounded worker pool and returns one ranked, risk-gated list per
//! cycle.

mod orchestrator;

pub use orchestrator::Orchestrator;
