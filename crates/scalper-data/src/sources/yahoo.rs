//! Yahoo Finance chart adapter, the free delayed feed.
//!
//! No auth, generous about symbols, but delayed and aggressively rate
//! limited, so it sits last among the real providers.

use async_trait::async_trait;
use reqwest::Client;
use scalper_core::{Bar, DataError, Interval, MarketDataSource, Quote};
use serde::Deserialize;
use tracing::debug;

pub const SOURCE_ID: &str = "yahoo";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<f64>,
    #[serde(rename = "regularMarketTime")]
    regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

/// Parallel arrays with nulls where the exchange reported no trade.
#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Yahoo chart API client.
pub struct YahooSource {
    base_url: String,
    client: Client,
}

impl YahooSource {
    pub fn new(client: Client) -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            client,
        }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<ChartResult, DataError> {
        let url = format!("{}/v8/finance/chart/{symbol}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", interval), ("range", range)])
            .send()
            .await
            .map_err(|e| DataError::Network {
                source_id: SOURCE_ID.to_string(),
                message: e.to_string(),
            })?;

        if resp.status().as_u16() == 404 {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        if !resp.status().is_success() {
            return Err(DataError::Status {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
                code: resp.status().as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().await.map_err(|e| DataError::Parse {
            source_id: SOURCE_ID.to_string(),
            message: e.to_string(),
        })?;

        chart
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            })
    }

    fn bars_from_chart(result: &ChartResult) -> Vec<Bar> {
        let Some(timestamps) = &result.timestamp else {
            return vec![];
        };
        let Some(quote) = result.indicators.quote.first() else {
            return vec![];
        };

        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                // Skip slots where the exchange reported no trade.
                let open = *quote.open.get(i)?;
                let high = *quote.high.get(i)?;
                let low = *quote.low.get(i)?;
                let close = *quote.close.get(i)?;
                let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
                Some(Bar::new(ts * 1000, open?, high?, low?, close?, volume))
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataSource for YahooSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let result = self.fetch_chart(symbol, "1d", "1d").await?;
        let meta = &result.meta;

        let price = meta
            .regular_market_price
            .filter(|p| *p > 0.0)
            .ok_or_else(|| DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            })?;
        let previous_close = meta.chart_previous_close.unwrap_or(0.0);
        let volume = meta.regular_market_volume.unwrap_or(0.0);
        let timestamp = meta.regular_market_time.map(|s| s * 1000).unwrap_or(0);

        debug!(symbol, price, "yahoo quote");
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
        let range = format!("{period_days}d");
        let result = self
            .fetch_chart(symbol, interval.as_str(), &range)
            .await?;

        let bars = Self::bars_from_chart(&result);
        if bars.is_empty() {
            return Err(DataError::EmptyPayload {
                source_id: SOURCE_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn id(&self) -> &str {
        SOURCE_ID
    }
}
