//! Market event bus.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use watch_core::types::{MarketUpdate, OutboundMessage};

use crate::registry::SubscriberRegistry;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    /// Subscribers in the snapshot
    pub attempted: usize,
    /// Deliveries that succeeded
    pub delivered: usize,
    /// Deliveries that failed
    pub failed: usize,
}

impl PublishReport {
    pub fn merge(&mut self, other: PublishReport) {
        self.attempted += other.attempted;
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Fans messages out to every current subscriber.
///
/// Each publish works on a registry snapshot taken when it starts, so
/// concurrent subscribe and unsubscribe calls only affect later publishes.
#[derive(Clone)]
pub struct MarketEventBus {
    registry: Arc<SubscriberRegistry>,
}

impl MarketEventBus {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Publish a market update as Markdown.
    pub async fn publish(&self, update: &MarketUpdate) -> PublishReport {
        debug!("Publishing {} update for {}", update.symbol, update.as_of);
        self.broadcast(OutboundMessage::markdown(update.message())).await
    }

    /// Send a message to every subscriber in the current snapshot.
    ///
    /// Delivery failures are logged and counted; they never stop delivery
    /// to the remaining subscribers.
    pub async fn broadcast(&self, message: OutboundMessage) -> PublishReport {
        let message = &message;
        let outcomes = self
            .registry
            .for_each_snapshot(|sub| async move {
                let result = sub.deliver.deliver(message).await;
                (sub.recipient, result)
            })
            .await;

        let mut report = PublishReport {
            attempted: outcomes.len(),
            ..Default::default()
        };
        for (recipient, result) in outcomes {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("Delivery to {} failed: {}", recipient, e);
                }
            }
        }
        report
    }
}
