//! Config validation command.

use std::path::Path;

use anyhow::Result;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    match scalper_config::load_config(config_path) {
        Ok(config) => {
            println!("configuration OK");
            println!("  providers: {}", config.data.provider_priority.join(" -> "));
            println!("  interval:  {}", config.data.interval);
            println!("  workers:   {}", config.orchestrator.workers);
            Ok(())
        }
        Err(e) => {
            eprintln!("configuration invalid: {e}");
            std::process::exit(1);
        }
    }
}
