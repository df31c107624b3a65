//! Recipient persistence trait.

use crate::error::StoreError;
use crate::types::RecipientId;
use async_trait::async_trait;

/// Durable storage for the subscriber set.
#[async_trait]
pub trait RecipientStore: Send + Sync {
    /// Load stored recipients in their stored order.
    ///
    /// A store that has never been written returns an empty list.
    async fn load(&self) -> Result<Vec<RecipientId>, StoreError>;

    /// Replace the stored recipients.
    async fn save(&self, recipients: &[RecipientId]) -> Result<(), StoreError>;
}
