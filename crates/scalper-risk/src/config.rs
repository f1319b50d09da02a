//! Risk gate configuration.

use rust_decimal::Decimal;
use scalper_core::{ScalperError, ScalperResult};
use serde::{Deserialize, Serialize};

/// Limits enforced by the [`RiskGate`](crate::RiskGate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Hard minimum account balance
    pub min_account_balance: Decimal,
    /// Extra headroom kept above the minimum; the protection floor is
    /// `min_account_balance + safety_buffer`
    pub safety_buffer: Decimal,
    /// Maximum number of simultaneously open positions
    pub max_concurrent_positions: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_account_balance: Decimal::from(25_000),
            safety_buffer: Decimal::from(1_000),
            max_concurrent_positions: 3,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> ScalperResult<()> {
        if self.min_account_balance <= Decimal::ZERO {
            return Err(ScalperError::Config(
                "min_account_balance must be positive".into(),
            ));
        }
        if self.safety_buffer < Decimal::ZERO {
            return Err(ScalperError::Config(
                "safety_buffer must not be negative".into(),
            ));
        }
        if self.max_concurrent_positions == 0 {
            return Err(ScalperError::Config(
                "max_concurrent_positions must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The balance below which protection trips.
    pub fn protection_floor(&self) -> Decimal {
        self.min_account_balance + self.safety_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_valid() {
        let config = RiskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.protection_floor(), dec!(26000));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = RiskConfig::default();
        config.min_account_balance = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = RiskConfig::default();
        config.safety_buffer = dec!(-1);
        assert!(config.validate().is_err());

        let mut config = RiskConfig::default();
        config.max_concurrent_positions = 0;
        assert!(config.validate().is_err());
    }
}
