//! Scalping screener CLI application.

mod bootstrap;
mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    logging::setup_logging(log_level, cli.json_logs);

    match cli.command {
        Commands::Rank(args) => cli::commands::rank::run(args, cli.config.as_deref()).await,
        Commands::Status => cli::commands::status::run(cli.config.as_deref()).await,
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref()).await,
    }
}
