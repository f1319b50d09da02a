//! Status command.

use std::path::Path;

use anyhow::Result;
use scalper_risk::RiskGate;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = scalper_config::load_config(config_path)?;
    let gate = RiskGate::new(config.risk.clone(), config.app.initial_balance)?;
    let account = gate.account_status();

    println!("account:   {}", config.app.name);
    println!("balance:   {}", account.current_balance);
    println!("daily pnl: {}", account.daily_pnl);
    println!(
        "trading:   {}",
        if account.trading_enabled { "enabled" } else { "disabled" }
    );
    println!("floor:     {}", config.risk.protection_floor());
    println!("level:     {:?}", gate.balance_warning_level());

    Ok(())
}
