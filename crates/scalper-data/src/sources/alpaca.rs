//! Alpaca market-data adapter, the secondary brokerage feed.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{header, Client};
use scalper_core::{Bar, DataError, Interval, MarketDataSource, Quote};
use serde::Deserialize;
use tracing::debug;

pub const SOURCE_ID: &str = "alpaca";

/// Alpaca data API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub data_url: String,
}

impl AlpacaConfig {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
            data_url: "https://data.alpaca.markets".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct BarsResponse {
    bars: Option<Vec<AlpacaBar>>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    #[serde(rename = "latestTrade")]
    latest_trade: Option<LatestTrade>,
    #[serde(rename = "dailyBar")]
    daily_bar: Option<AlpacaBar>,
    #[serde(rename = "prevDailyBar")]
    prev_daily_bar: Option<AlpacaBar>,
}

#[derive(Debug, Deserialize)]
struct LatestTrade {
    p: f64,
    t: String,
}

/// Alpaca stocks data client.
pub struct AlpacaSource {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaSource {
    pub fn new(config: AlpacaConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn timeframe(interval: Interval) -> &'static str {
        match interval {
            Interval::OneMinute => "1Min",
            Interval::FiveMinutes => "5Min",
            Interval::FifteenMinutes => "15Min",
            Interval::OneHour => "1Hour",
            Interval::Daily => "1Day",
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&self.config.api_key).map_err(|e| {
                DataError::Network {
                    source_id: SOURCE_ID.to_string(),
                    message: e.to_string(),
                }
            })?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&self.config.api_secret).map_err(|e| {
                DataError::Network {
                    source_id: SOURCE_ID.to_string(),
                    message: e.to_string(),
                }
            })?,
        );
        Ok(headers)
    }

    fn parse_rfc3339_millis(raw: &str) -> i64 {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MarketDataSource for AlpacaSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let url = format!("{}/v2/stocks/{symbol}/snapshot", self.config.data_url);

        let resp = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| DataError::Network {
                source_id: SOURCE_ID.to_string(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DataError::Status {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
                code: resp.status().as_u16(),
            });
        }

        let snapshot: SnapshotResponse = resp.json().await.map_err(|e| DataError::Parse {
            source_id: SOURCE_ID.to_string(),
            message: e.to_string(),
        })?;

        let trade = snapshot
            .latest_trade
            .filter(|t| t.p > 0.0)
            .ok_or_else(|| DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            })?;
        let previous_close = snapshot.prev_daily_bar.as_ref().map(|b| b.c).unwrap_or(0.0);
        let volume = snapshot.daily_bar.as_ref().map(|b| b.v).unwrap_or(0.0);
        let timestamp = Self::parse_rfc3339_millis(&trade.t);

        debug!(symbol, price = trade.p, "alpaca quote");
        Ok(Quote::new(
            symbol,
            trade.p,
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
        let url = format!("{}/v2/stocks/{symbol}/bars", self.config.data_url);
        let start = (Utc::now() - ChronoDuration::days(i64::from(period_days))).to_rfc3339();

        let resp = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(&[
                ("timeframe", Self::timeframe(interval)),
                ("start", start.as_str()),
                ("feed", "iex"),
                ("limit", "10000"),
            ])
            .send()
            .await
            .map_err(|e| DataError::Network {
                source_id: SOURCE_ID.to_string(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DataError::Status {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
                code: resp.status().as_u16(),
            });
        }

        let data: BarsResponse = resp.json().await.map_err(|e| DataError::Parse {
            source_id: SOURCE_ID.to_string(),
            message: e.to_string(),
        })?;

        let bars = data.bars.unwrap_or_default();
        if bars.is_empty() {
            return Err(DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }

        Ok(bars
            .into_iter()
            .map(|b| {
                Bar::new(
                    Self::parse_rfc3339_millis(&b.t),
                    b.o,
                    b.h,
                    b.l,
                    b.c,
                    b.v,
                )
            })
            .collect())
    }

    fn id(&self) -> &str {
        SOURCE_ID
    }
}
