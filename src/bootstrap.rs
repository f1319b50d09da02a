//! Wires configuration into a running orchestrator.

use std::sync::Arc;
use std::time::Duration;

use scalper_config::AppConfig;
use scalper_core::{MarketDataSource, ScalperError, ScalperResult};
use scalper_data::sources::{
    alpaca, polygon, yahoo, AlpacaConfig, AlpacaSource, PolygonConfig, PolygonSource, YahooSource,
};
use scalper_data::{DataRouter, RateLimiter};
use scalper_engine::Orchestrator;
use scalper_indicators::IndicatorEngine;
use scalper_risk::RiskGate;
use scalper_score::ScoringEngine;
use tracing::{info, warn};

/// Build the provider chain named by `provider_priority`, skipping keyed
/// providers whose credentials are absent.
fn build_sources(config: &AppConfig) -> ScalperResult<Vec<Arc<dyn MarketDataSource>>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| ScalperError::Config(e.to_string()))?;

    let keys = &config.data.keys;
    let mut sources: Vec<Arc<dyn MarketDataSource>> = Vec::new();

    for name in &config.data.provider_priority {
        match name.as_str() {
            polygon::SOURCE_ID => match std::env::var(&keys.polygon_key_env) {
                Ok(key) => sources.push(Arc::new(PolygonSource::new(
                    PolygonConfig::new(key),
                    client.clone(),
                ))),
                Err(_) => {
                    warn!(env = %keys.polygon_key_env, "polygon key not set, skipping provider")
                }
            },
            alpaca::SOURCE_ID => {
                match (
                    std::env::var(&keys.alpaca_key_env),
                    std::env::var(&keys.alpaca_secret_env),
                ) {
                    (Ok(key), Ok(secret)) => sources.push(Arc::new(AlpacaSource::new(
                        AlpacaConfig::new(key, secret),
                        client.clone(),
                    ))),
                    _ => warn!("alpaca credentials not set, skipping provider"),
                }
            }
            yahoo::SOURCE_ID => sources.push(Arc::new(YahooSource::new(client.clone()))),
            other => {
                return Err(ScalperError::Config(format!(
                    "unknown provider in priority list: {other}"
                )));
            }
        }
    }

    if sources.is_empty() {
        warn!("no real providers configured, every fetch will be synthetic");
    }
    Ok(sources)
}

fn build_limiter(config: &AppConfig) -> ScalperResult<RateLimiter> {
    RateLimiter::new(Duration::from_secs_f64(
        config.data.keyed_feed_interval_secs,
    ))?
    .with_interval(
        yahoo::SOURCE_ID,
        Duration::from_secs_f64(config.data.delayed_feed_interval_secs),
    )
}

/// Assemble the full pipeline from validated configuration.
pub fn build_orchestrator(config: &AppConfig) -> ScalperResult<Orchestrator> {
    let sources = build_sources(config)?;
    let limiter = build_limiter(config)?;
    let router = Arc::new(DataRouter::new(
        sources,
        limiter,
        Duration::from_secs(config.data.cache_ttl_secs),
    ));

    let indicators = IndicatorEngine::new(config.indicators.clone());
    let scoring = ScoringEngine::new(
        config.scoring.weights.clone(),
        config.scoring.momentum_curve.clone(),
        config.scoring.thresholds.clone(),
    )?;
    let risk = Arc::new(RiskGate::new(
        config.risk.clone(),
        config.app.initial_balance,
    )?);

    info!(
        providers = config.data.provider_priority.len(),
        workers = config.orchestrator.workers,
        "orchestrator ready"
    );
    Ok(Orchestrator::new(
        router,
        indicators,
        scoring,
        risk,
        config.data.interval,
        config.data.period_days,
    )
    .with_workers(config.orchestrator.workers))
}
