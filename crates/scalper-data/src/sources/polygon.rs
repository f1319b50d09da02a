//! Polygon.io adapter, the primary professional feed.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use scalper_core::{Bar, DataError, Interval, MarketDataSource, Quote};
use serde::Deserialize;
use tracing::debug;

pub const SOURCE_ID: &str = "polygon";

/// Polygon API configuration.
#[derive(Debug, Clone)]
pub struct PolygonConfig {
    pub api_key: String,
    pub base_url: String,
}

impl PolygonConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.polygon.io".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    ticker: Option<SnapshotTicker>,
}

#[derive(Debug, Deserialize)]
struct SnapshotTicker {
    day: Option<SnapshotAgg>,
    #[serde(rename = "prevDay")]
    prev_day: Option<SnapshotAgg>,
    #[serde(rename = "lastTrade")]
    last_trade: Option<SnapshotTrade>,
    updated: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SnapshotAgg {
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct SnapshotTrade {
    p: f64,
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    results: Option<Vec<AggBar>>,
}

#[derive(Debug, Deserialize)]
struct AggBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

/// Polygon aggregates and snapshot client.
pub struct PolygonSource {
    config: PolygonConfig,
    client: Client,
}

impl PolygonSource {
    pub fn new(config: PolygonConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn range_parts(interval: Interval) -> (u32, &'static str) {
        match interval {
            Interval::OneMinute => (1, "minute"),
            Interval::FiveMinutes => (5, "minute"),
            Interval::FifteenMinutes => (15, "minute"),
            Interval::OneHour => (1, "hour"),
            Interval::Daily => (1, "day"),
        }
    }

    fn network_err(e: reqwest::Error) -> DataError {
        DataError::Network {
            source_id: SOURCE_ID.to_string(),
            message: e.to_string(),
        }
    }

    fn parse_err(e: reqwest::Error) -> DataError {
        DataError::Parse {
            source_id: SOURCE_ID.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl MarketDataSource for PolygonSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let url = format!(
            "{}/v2/snapshot/locale/us/markets/stocks/tickers/{symbol}",
            self.config.base_url
        );

        let resp = self
            .client
            .get(&url)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(Self::network_err)?;

        if !resp.status().is_success() {
            return Err(DataError::Status {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
                code: resp.status().as_u16(),
            });
        }

        let snapshot: SnapshotResponse = resp.json().await.map_err(Self::parse_err)?;
        let ticker = snapshot.ticker.ok_or_else(|| DataError::EmptyPayload {
            source_id: SOURCE_ID.to_string(),
            symbol: symbol.to_string(),
        })?;

        let day = ticker.day.as_ref();
        let price = ticker
            .last_trade
            .as_ref()
            .map(|t| t.p)
            .or(day.map(|d| d.c))
            .filter(|p| *p > 0.0)
            .ok_or_else(|| DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            })?;
        let previous_close = ticker.prev_day.as_ref().map(|d| d.c).unwrap_or(0.0);
        let volume = day.map(|d| d.v).unwrap_or(0.0);
        // Snapshot timestamps are nanoseconds since epoch.
        let timestamp = ticker
            .updated
            .map(|ns| ns / 1_000_000)
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        debug!(symbol, price, "polygon quote");
        Ok(Quote::new(
            symbol,
            price,
            previous_close,
            volume,
            timestamp,
            SOURCE_ID,
        ))
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        period_days: u32,
    ) -> Result<Vec<Bar>, DataError> {
        let (multiplier, timespan) = Self::range_parts(interval);
        let to = Utc::now().date_naive();
        let from = to - ChronoDuration::days(i64::from(period_days));
        let url = format!(
            "{}/v2/aggs/ticker/{symbol}/range/{multiplier}/{timespan}/{from}/{to}",
            self.config.base_url
        );

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
                ("apiKey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(Self::network_err)?;

        if !resp.status().is_success() {
            return Err(DataError::Status {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
                code: resp.status().as_u16(),
            });
        }

        let aggs: AggsResponse = resp.json().await.map_err(Self::parse_err)?;
        let results = aggs.results.unwrap_or_default();
        if results.is_empty() {
            return Err(DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }

        Ok(results
            .into_iter()
            .map(|b| Bar::new(b.t, b.o, b.h, b.l, b.c, b.v))
            .collect())
    }

    fn id(&self) -> &str {
        SOURCE_ID
    }
}
