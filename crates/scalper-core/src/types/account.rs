//! Account state for balance protection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of the trading account as tracked by the risk gate.
///
/// Money fields use exact decimal arithmetic. The struct itself is a plain
/// value; single-writer discipline is enforced by the gate that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Balance at session start
    pub initial_balance: Decimal,
    /// Current balance after realized P&L
    pub current_balance: Decimal,
    /// Realized P&L since the last daily reset
    pub daily_pnl: Decimal,
    /// False while balance protection is in force
    pub trading_enabled: bool,
    /// True once protection has fired for the current episode
    pub protection_triggered: bool,
}

impl AccountState {
    /// Create the session-start state.
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            current_balance: initial_balance,
            daily_pnl: Decimal::ZERO,
            trading_enabled: true,
            protection_triggered: false,
        }
    }

    /// Realized P&L since session start.
    pub fn total_pnl(&self) -> Decimal {
        self.current_balance - self.initial_balance
    }
}
