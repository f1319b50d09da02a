//! Configuration structures.

use rust_decimal::Decimal;
use scalper_core::{Interval, ScalperError, ScalperResult};
use scalper_indicators::IndicatorPeriods;
use scalper_risk::RiskConfig;
use scalper_score::{MomentumCurve, ScoreWeights, SignalThresholds};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub indicators: IndicatorPeriods,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
}

impl AppConfig {
    /// Fail fast on a bad deployment, before any fetch begins.
    pub fn validate(&self) -> ScalperResult<()> {
        self.data.validate()?;
        self.scoring.weights.validate()?;
        self.scoring.momentum_curve.validate()?;
        self.scoring.thresholds.validate()?;
        self.risk.validate()?;
        self.orchestrator.validate()?;
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
    /// Starting account balance handed to the risk gate
    pub initial_balance: Decimal,
}

impl Default for AppSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            name: "scalper".to_string(),
            environment: "development".to_string(),
            initial_balance: dec!(30000),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment variable names holding provider credentials. The values
/// themselves never live in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderKeys {
    pub polygon_key_env: String,
    pub alpaca_key_env: String,
    pub alpaca_secret_env: String,
}

impl Default for ProviderKeys {
    fn default() -> Self {
        Self {
            polygon_key_env: "POLYGON_API_KEY".to_string(),
            alpaca_key_env: "ALPACA_API_KEY".to_string(),
            alpaca_secret_env: "ALPACA_API_SECRET".to_string(),
        }
    }
}

/// Data layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Cache freshness window, seconds
    pub cache_ttl_secs: u64,
    /// Minimum spacing between calls to the free delayed feed, seconds
    pub delayed_feed_interval_secs: f64,
    /// Minimum spacing between calls to keyed feeds, seconds
    pub keyed_feed_interval_secs: f64,
    /// Provider priority, first is tried first
    pub provider_priority: Vec<String>,
    /// Bar aggregation interval requested per symbol
    pub interval: Interval,
    /// Bar history window requested per symbol, days
    pub period_days: u32,
    #[serde(default)]
    pub keys: ProviderKeys,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30,
            delayed_feed_interval_secs: 1.0,
            keyed_feed_interval_secs: 0.1,
            provider_priority: vec![
                "polygon".to_string(),
                "alpaca".to_string(),
                "yahoo".to_string(),
            ],
            interval: Interval::OneMinute,
            period_days: 1,
            keys: ProviderKeys::default(),
        }
    }
}

impl DataSettings {
    pub fn validate(&self) -> ScalperResult<()> {
        if self.cache_ttl_secs == 0 {
            return Err(ScalperError::Config("cache_ttl_secs must be positive".into()));
        }
        if self.delayed_feed_interval_secs <= 0.0 || self.keyed_feed_interval_secs <= 0.0 {
            return Err(ScalperError::Config(
                "rate limiter intervals must be positive".into(),
            ));
        }
        if self.provider_priority.is_empty() {
            return Err(ScalperError::Config(
                "provider_priority must name at least one provider".into(),
            ));
        }
        if self.period_days == 0 {
            return Err(ScalperError::Config("period_days must be positive".into()));
        }
        Ok(())
    }
}

/// Scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub momentum_curve: MomentumCurve,
    #[serde(default)]
    pub thresholds: SignalThresholds,
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Worker pool size for the watch-list fan-out
    pub workers: usize,
    /// Per-symbol pipeline deadline, seconds
    pub deadline_secs: u64,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            workers: 5,
            deadline_secs: 30,
        }
    }
}

impl OrchestratorSettings {
    pub fn validate(&self) -> ScalperResult<()> {
        if self.workers == 0 {
            return Err(ScalperError::Config("workers must be at least 1".into()));
        }
        if self.deadline_secs == 0 {
            return Err(ScalperError::Config("deadline_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_data_settings_rejected() {
        let mut config = AppConfig::default();
        config.data.cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.delayed_feed_interval_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.provider_priority.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_orchestrator_settings_rejected() {
        let mut config = AppConfig::default();
        config.orchestrator.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_scoring_weights_rejected() {
        let mut config = AppConfig::default();
        config.scoring.weights.momentum = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_serde() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.data.provider_priority, config.data.provider_priority);
    }
}
