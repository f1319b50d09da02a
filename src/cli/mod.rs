//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scalper")]
#[command(author, version, about = "Watch-list ranking core for short-horizon scalping")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a watch list by scalping score
    Rank(RankArgs),
    /// Show the account and risk gate status
    Status,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RankArgs {
    /// Symbols to rank (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Per-symbol deadline in seconds, overriding the configured value
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}
