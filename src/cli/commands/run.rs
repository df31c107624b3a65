//! Run the bot until interrupted.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use watch_core::traits::{RecipientStore, Transport};
use watch_data::RecipientFile;
use watch_engine::{MarketEventBus, Poller, ServiceSettings, SubscriberRegistry, WatchService};
use watch_indicators::MarketSummarizer;
use watch_transport::{ConsoleTransport, TelegramConfig, TelegramTransport};

use super::{load_valid_config, market_data};
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config = load_valid_config(config_path)?;
    let schedule = config.schedule()?;

    // Dry runs keep their subscribers away from the real store.
    let transport: Arc<dyn Transport>;
    let store: Arc<dyn RecipientStore>;
    if args.dry_run {
        let scratch = std::env::temp_dir().join("market-watch-dry-run-ids");
        info!("Dry run: messages go to stdout, commands come from stdin, subscribers in {:?}", scratch);
        transport = Arc::new(ConsoleTransport::default());
        store = Arc::new(RecipientFile::new(scratch));
    } else {
        let telegram = TelegramConfig::from_env(&config.telegram.token_env)?.with_base_url(&config.telegram.base_url);
        transport = Arc::new(TelegramTransport::new(telegram)?);
        store = Arc::new(RecipientFile::new(&config.storage.recipients_path));
    }

    let registry = Arc::new(SubscriberRegistry::new());
    let poller = Poller::new(
        market_data(&config)?,
        MarketEventBus::new(Arc::clone(&registry)),
        MarketSummarizer::new(config.summary_config()),
        config.market_data.symbols.clone(),
    )
    .with_name_lookup(config.market_data.lookup_names);

    info!(
        "Watching {:?} on '{}' ({})",
        config.market_data.symbols,
        schedule.expression(),
        schedule.timezone()
    );

    let service = WatchService::new(
        registry,
        transport,
        store,
        Arc::new(poller),
        schedule,
        ServiceSettings {
            run_on_startup: config.schedule.run_on_startup,
            receive_timeout: config.telegram.poll_timeout(),
            ..Default::default()
        },
    );

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown requested");
        let _ = tx.send(true);
    });

    service.run(rx).await?;
    info!("Stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
