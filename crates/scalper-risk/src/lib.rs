//! Balance protection and trade gating.
//!
//! The gate tracks a single account and refuses trades that would push
//! the balance below a configured floor. Once protection trips, trading
//! stays off until an operator explicitly resets it; nothing in this
//! crate re-enables trading on its own.

mod config;
mod gate;

pub use config::RiskConfig;
pub use gate::{BalanceWarning, RiskGate};
