//! Market data source capability.

use crate::error::DataError;
use crate::types::{Bar, Interval, Quote};
use async_trait::async_trait;

/// One upstream market-data provider, normalized.
///
/// Each adapter owns the translation from its provider's idiosyncratic
/// payload into the canonical `Quote`/`Bar` shapes; auth and token refresh
/// are the adapter's problem, invisible to the router. Adapter failures are
/// ordinary `DataError`s that the router's fallback chain absorbs.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the latest quote for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DataError>;

    /// Fetch historical bars covering roughly `period_days` at `interval`,
    /// ordered oldest to newest.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        period_days: u32,
    ) -> Result<Vec<Bar>, DataError>;

    /// Stable identifier for logging and `source_id` tagging.
    fn id(&self) -> &str;
}
