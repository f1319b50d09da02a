//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the given level. `RUST_LOG` wins over the CLI flag.
pub fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_target(false))
            .init();
    }
}
