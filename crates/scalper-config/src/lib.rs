//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, LoggingConfig, OrchestratorSettings, ProviderKeys,
    ScoringSettings,
};

use config::{Config, Environment, File};
use scalper_core::{ScalperError, ScalperResult};
use std::path::Path;

/// Load configuration from an optional file plus `SCALPER__`-prefixed
/// environment variables, then validate it.
pub fn load_config(path: Option<&Path>) -> ScalperResult<AppConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("SCALPER")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ScalperError::Config(e.to_string()))?;

    let app: AppConfig = config
        .try_deserialize()
        .map_err(|e| ScalperError::Config(e.to_string()))?;
    app.validate()?;
    Ok(app)
}
