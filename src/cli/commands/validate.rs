//! Validate configuration command.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use watch_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }
    let schedule = config.schedule()?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbols: {}", config.market_data.symbols.join(", "));
    println!("Lookback: {} ({:?} divisor)", config.indicators.lookback, config.indicators.divisor);
    println!("Schedule: {} ({})", schedule.expression(), schedule.timezone());
    for next in schedule.upcoming(Utc::now(), 3) {
        println!("  next: {}", next.with_timezone(&schedule.timezone()));
    }
    println!("Subscribers file: {}", config.storage.recipients_path);
    println!(
        "API key variable: {} ({})",
        config.market_data.api_key_env,
        if std::env::var_os(&config.market_data.api_key_env).is_some() { "set" } else { "not set" }
    );
    println!(
        "Bot token variable: {} ({})",
        config.telegram.token_env,
        if std::env::var_os(&config.telegram.token_env).is_some() { "set" } else { "not set" }
    );

    Ok(())
}
