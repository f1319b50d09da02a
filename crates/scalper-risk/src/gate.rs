//! The balance-protection gate.

use std::collections::HashSet;
use std::sync::Mutex;

use rust_decimal::Decimal;
use scalper_core::{AccountState, ScalperResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RiskConfig;

/// Coarse health read of the account relative to the protection floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceWarning {
    /// Comfortably above the floor
    Safe,
    /// Within 10% of the floor
    Caution,
    /// Within 5% of the floor
    Warning,
    /// At or below the floor
    Critical,
}

struct GateInner {
    account: AccountState,
    open_positions: HashSet<String>,
}

/// Single-account trade gate.
///
/// State machine with two modes. Active: balance updates flow through and
/// trades are checked against the floor. Protected: entered the moment a
/// balance update lands below the floor; every trade is denied until an
/// operator calls [`reset_protection`](RiskGate::reset_protection). The
/// protection warning fires once per episode, not on every update while
/// protected.
pub struct RiskGate {
    config: RiskConfig,
    inner: Mutex<GateInner>,
}

impl RiskGate {
    pub fn new(config: RiskConfig, initial_balance: Decimal) -> ScalperResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            inner: Mutex::new(GateInner {
                account: AccountState::new(initial_balance),
                open_positions: HashSet::new(),
            }),
        })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Apply a signed balance change and return the resulting state.
    /// Trips protection when the new balance lands below the floor.
    pub fn update_balance(&self, delta: Decimal) -> AccountState {
        let mut inner = self.inner.lock().unwrap();
        inner.account.current_balance += delta;
        inner.account.daily_pnl += delta;

        let floor = self.config.protection_floor();
        if inner.account.trading_enabled && inner.account.current_balance < floor {
            inner.account.trading_enabled = false;
            inner.account.protection_triggered = true;
            warn!(
                balance = %inner.account.current_balance,
                floor = %floor,
                "balance protection triggered, trading disabled"
            );
        }

        inner.account.clone()
    }

    /// Operator acknowledgment: set a fresh balance and re-enable trading.
    /// Accepted even below the floor; protection re-arms on the next
    /// balance update.
    pub fn reset_protection(&self, new_balance: Decimal) -> AccountState {
        let mut inner = self.inner.lock().unwrap();
        inner.account.current_balance = new_balance;
        inner.account.trading_enabled = true;
        inner.account.protection_triggered = false;
        info!(balance = %new_balance, "balance protection reset by operator");
        inner.account.clone()
    }

    /// Whether a trade of `quantity` at `price` may go ahead, with a
    /// human-readable reason when it may not.
    pub fn check_trade_allowed(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> (bool, String) {
        let inner = self.inner.lock().unwrap();

        if !inner.account.trading_enabled {
            return (
                false,
                "balance protection active, trading disabled".to_string(),
            );
        }

        if inner.open_positions.len() >= self.config.max_concurrent_positions
            && !inner.open_positions.contains(symbol)
        {
            return (
                false,
                format!(
                    "open position limit reached ({})",
                    self.config.max_concurrent_positions
                ),
            );
        }

        let cost = quantity * price;
        let floor = self.config.protection_floor();
        // The floor projection only applies from above it. After an
        // operator reset below the floor, small trades stay allowed.
        if inner.account.current_balance >= floor
            && inner.account.current_balance - cost < floor
        {
            return (
                false,
                format!("trade of {cost} would breach the balance floor of {floor}"),
            );
        }

        (true, "allowed".to_string())
    }

    pub fn record_position_opened(&self, symbol: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.open_positions.insert(symbol.to_string());
    }

    pub fn record_position_closed(&self, symbol: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.open_positions.remove(symbol);
    }

    pub fn open_position_count(&self) -> usize {
        self.inner.lock().unwrap().open_positions.len()
    }

    /// Snapshot of the account state.
    pub fn account_status(&self) -> AccountState {
        self.inner.lock().unwrap().account.clone()
    }

    /// Zero the daily P&L counter, typically at session open.
    pub fn reset_daily_pnl(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.account.daily_pnl = Decimal::ZERO;
    }

    pub fn balance_warning_level(&self) -> BalanceWarning {
        let inner = self.inner.lock().unwrap();
        let floor = self.config.protection_floor();
        let balance = inner.account.current_balance;

        let caution = floor * Decimal::new(110, 2); // floor * 1.10
        let warning = floor * Decimal::new(105, 2); // floor * 1.05

        if balance <= floor {
            BalanceWarning::Critical
        } else if balance <= warning {
            BalanceWarning::Warning
        } else if balance <= caution {
            BalanceWarning::Caution
        } else {
            BalanceWarning::Safe
        }
    }
}
