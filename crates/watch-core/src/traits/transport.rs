//! Chat transport trait definitions.

use crate::error::TransportError;
use crate::types::{InboundMessage, OutboundMessage, RecipientId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Trait for chat transports.
///
/// Transports deliver text to recipients and hand back raw inbound text.
/// Command parsing happens above this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a message to one recipient.
    async fn send(&self, recipient: RecipientId, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Wait up to `timeout` for inbound messages.
    ///
    /// # Returns
    /// The messages received, possibly none
    async fn receive(&self, timeout: Duration) -> Result<Vec<InboundMessage>, TransportError>;

    /// Name the transport presents to users (e.g. the bot username).
    async fn identity(&self) -> Result<String, TransportError>;

    /// Get the transport name.
    fn name(&self) -> &str;
}

/// Delivery capability for a single subscriber.
#[async_trait]
pub trait Deliver: Send + Sync {
    /// Deliver a message to the bound recipient.
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Delivery capability bound to one recipient on a shared transport.
#[derive(Clone)]
pub struct TransportDelivery {
    transport: Arc<dyn Transport>,
    recipient: RecipientId,
}

impl TransportDelivery {
    pub fn new(transport: Arc<dyn Transport>, recipient: RecipientId) -> Self {
        Self { transport, recipient }
    }

    pub fn recipient(&self) -> RecipientId {
        self.recipient
    }
}

#[async_trait]
impl Deliver for TransportDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.transport.send(self.recipient, message).await
    }
}
