//! Capability traits.

mod source;

pub use source::MarketDataSource;
