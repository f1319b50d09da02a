//! Error types for the scalping screener.

use thiserror::Error;

/// Top-level error for the screener core.
#[derive(Error, Debug)]
pub enum ScalperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a single source adapter.
///
/// These never cross the router boundary: the fallback chain absorbs them
/// and moves on to the next provider.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Network error from {source_id}: {message}")]
    Network { source_id: String, message: String },

    #[error("{source_id} returned HTTP {code} for {symbol}")]
    Status {
        source_id: String,
        symbol: String,
        code: u16,
    },

    #[error("Parse error from {source_id}: {message}")]
    Parse { source_id: String, message: String },

    #[error("{source_id} returned an empty payload for {symbol}")]
    EmptyPayload { source_id: String, symbol: String },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
}

/// Result type alias for screener operations.
pub type ScalperResult<T> = Result<T, ScalperError>;
