//! Long-running watch service.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};
use watch_core::error::{StoreError, WatchResult};
use watch_core::traits::{RecipientStore, Transport, TransportDelivery};
use watch_core::types::OutboundMessage;

use crate::bus::{MarketEventBus, PublishReport};
use crate::commands::CommandHandler;
use crate::poller::Poller;
use crate::registry::SubscriberRegistry;
use crate::schedule::Schedule;

/// Runtime knobs for [`WatchService`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Poll once immediately on start
    pub run_on_startup: bool,
    /// Long-poll window for inbound messages
    pub receive_timeout: Duration,
    /// Pause after a failed receive
    pub retry_delay: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            run_on_startup: true,
            receive_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Wires the registry, transport, store and poller together.
pub struct WatchService {
    registry: Arc<SubscriberRegistry>,
    bus: MarketEventBus,
    handler: CommandHandler,
    transport: Arc<dyn Transport>,
    store: Arc<dyn RecipientStore>,
    poller: Arc<Poller>,
    schedule: Schedule,
    settings: ServiceSettings,
}

impl WatchService {
    pub fn new(
        registry: Arc<SubscriberRegistry>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn RecipientStore>,
        poller: Arc<Poller>,
        schedule: Schedule,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            bus: MarketEventBus::new(Arc::clone(&registry)),
            handler: CommandHandler::new(Arc::clone(&registry), Arc::clone(&transport)),
            registry,
            transport,
            store,
            poller,
            schedule,
            settings,
        }
    }

    /// Register every stored recipient.
    ///
    /// # Returns
    /// The number of recipients added.
    pub async fn restore(&self) -> Result<usize, StoreError> {
        let mut added = 0;
        for id in self.store.load().await? {
            let delivery = Arc::new(TransportDelivery::new(Arc::clone(&self.transport), id));
            if self.registry.add(id, delivery) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Tell every subscriber the bot is back.
    pub async fn greet(&self, bot_name: &str) -> PublishReport {
        self.bus
            .broadcast(OutboundMessage::plain(format!("{} is active again!", bot_name)))
            .await
    }

    /// Run until `shutdown` turns true, then persist and say goodbye.
    ///
    /// Fails only during startup: an unreadable recipient store or a
    /// transport that cannot identify itself.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> WatchResult<()> {
        let restored = self.restore().await?;
        let bot_name = self.transport.identity().await?;
        info!(
            "{} starting on {} with {} subscribers",
            bot_name,
            self.transport.name(),
            restored
        );
        self.greet(&bot_name).await;

        let poller = tokio::spawn({
            let poller = Arc::clone(&self.poller);
            let schedule = self.schedule.clone();
            let run_on_startup = self.settings.run_on_startup;
            let shutdown = shutdown.clone();
            async move { poller.run(&schedule, run_on_startup, shutdown).await }
        });

        self.receive_loop(shutdown).await;

        if let Err(e) = poller.await {
            error!("Poller task failed: {}", e);
        }
        self.shutdown().await;
        Ok(())
    }

    async fn receive_loop(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Listening for commands");
        while !*shutdown.borrow() {
            tokio::select! {
                received = self.transport.receive(self.settings.receive_timeout) => match received {
                    Ok(messages) => {
                        for message in &messages {
                            // Reply failures are logged by the handler.
                            let _ = self.handler.respond(message).await;
                        }
                    }
                    Err(e) => {
                        warn!("Receive failed, retrying in {:?}: {}", self.settings.retry_delay, e);
                        tokio::select! {
                            _ = tokio::time::sleep(self.settings.retry_delay) => {}
                            _ = shutdown.changed() => break,
                        }
                    }
                },
                _ = shutdown.changed() => break,
            }
        }
        info!("Stopped listening for commands");
    }

    /// Persist the current subscribers, then notify them.
    ///
    /// A failed save is logged; the notice is still sent.
    pub async fn shutdown(&self) -> PublishReport {
        let ids = self.registry.ids();
        match self.store.save(&ids).await {
            Ok(()) => info!("Saved {} subscribers", ids.len()),
            Err(e) => error!("Failed to save subscribers: {}", e),
        }

        self.bus
            .broadcast(OutboundMessage::plain("Bot is shutting down temporarily."))
            .await
    }
}
