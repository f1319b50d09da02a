//! Rank command.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::bootstrap::build_orchestrator;
use crate::cli::RankArgs;

pub async fn run(args: RankArgs, config_path: Option<&Path>) -> Result<()> {
    let config = scalper_config::load_config(config_path)?;
    let orchestrator = build_orchestrator(&config)?;

    let deadline = Duration::from_secs(args.deadline.unwrap_or(config.orchestrator.deadline_secs));
    let ranked = orchestrator.rank_watchlist(&args.symbols, deadline).await;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("no symbols produced a score");
        return Ok(());
    }

    println!(
        "{:<4} {:<8} {:>7} {:>6} {:>10} {:>5} {:>5} {:>5} {:>5}",
        "#", "symbol", "score", "dir", "price", "vol", "mom", "trnd", "volm"
    );
    for (rank, record) in ranked.iter().enumerate() {
        let c = record.components;
        println!(
            "{:<4} {:<8} {:>7.1} {:>6} {:>10.2} {:>5.0} {:>5.0} {:>5.0} {:>5.0}",
            rank + 1,
            record.symbol,
            record.overall_score,
            record.direction.to_string(),
            record.current_price,
            c.volatility,
            c.momentum,
            c.trend,
            c.volume,
        );
    }

    Ok(())
}
