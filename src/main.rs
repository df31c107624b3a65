//! Market watch bot.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use watch_config::{load_config, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the file when it loads; the commands
    // report load errors themselves.
    let file_logging = load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig::default());
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(file_logging.level);
    let json = cli.json_logs || file_logging.format == LogFormat::Json;
    let _guard = logging::setup_logging(&log_level, json, file_logging.file.as_deref().map(Path::new));

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &cli.config).await,
        Commands::Once(args) => cli::commands::once::run(args, &cli.config).await,
        Commands::Subscribers => cli::commands::subscribers::run(&cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
