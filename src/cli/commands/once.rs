//! Single poll cycle printed to stdout.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use watch_engine::{poll_date, MarketEventBus, Poller, SubscriberRegistry};
use watch_indicators::MarketSummarizer;

use super::{load_valid_config, market_data};
use crate::cli::{OnceArgs, OutputFormat};

pub async fn run(args: OnceArgs, config_path: &Path) -> Result<()> {
    let config = load_valid_config(config_path)?;

    let today = match &args.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?,
        None => poll_date(Utc::now()),
    };
    let symbols = if args.symbols.is_empty() {
        config.market_data.symbols.clone()
    } else {
        args.symbols
    };
    info!("Polling {:?} for {}", symbols, today);

    // No subscribers: updates are only printed.
    let poller = Poller::new(
        market_data(&config)?,
        MarketEventBus::new(Arc::new(SubscriberRegistry::new())),
        MarketSummarizer::new(config.summary_config()),
        symbols,
    )
    .with_name_lookup(config.market_data.lookup_names);

    let report = poller
        .fire(today)
        .await
        .ok_or_else(|| anyhow!("Poller is already running"))?;

    match args.output {
        OutputFormat::Text => {
            for update in &report.updates {
                println!("{}\n", update.message());
            }
            for failure in &report.failures {
                println!("{}: skipped ({})", failure.symbol, failure.reason);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.updates.is_empty() {
        bail!("No symbol could be summarized");
    }
    Ok(())
}
