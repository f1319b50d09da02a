//! Provider adapters.
//!
//! One module per upstream provider, each translating that provider's
//! JSON into canonical `Quote`/`Bar` values behind the
//! `MarketDataSource` trait.

pub mod alpaca;
pub mod polygon;
pub mod synthetic;
pub mod yahoo;

pub use alpaca::{AlpacaConfig, AlpacaSource};
pub use polygon::{PolygonConfig, PolygonSource};
pub use synthetic::SyntheticSource;
pub use yahoo::YahooSource;
