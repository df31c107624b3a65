//! Subscriber registry.

use futures::future::join_all;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use watch_core::traits::Deliver;
use watch_core::types::RecipientId;

/// A recipient and its delivery capability.
#[derive(Clone)]
pub struct Subscription {
    pub recipient: RecipientId,
    pub deliver: Arc<dyn Deliver>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

/// Point-in-time copy of the registry, ordered by recipient id.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    members: Vec<Subscription>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> Vec<RecipientId> {
        self.members.iter().map(|s| s.recipient).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.members.iter()
    }
}

impl IntoIterator for Snapshot {
    type Item = Subscription;
    type IntoIter = std::vec::IntoIter<Subscription>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

/// Concurrent set of subscribers.
///
/// Each operation holds the lock for a single insert, remove or copy and
/// never across an await, so snapshots are consistent and cheap.
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: RwLock<HashMap<RecipientId, Arc<dyn Deliver>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written entry.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<RecipientId, Arc<dyn Deliver>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RecipientId, Arc<dyn Deliver>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a subscriber.
    ///
    /// # Returns
    /// `false` if the recipient was already subscribed; the existing
    /// delivery capability is kept.
    pub fn add(&self, recipient: RecipientId, deliver: Arc<dyn Deliver>) -> bool {
        match self.write().entry(recipient) {
            Entry::Vacant(slot) => {
                slot.insert(deliver);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Remove a subscriber.
    ///
    /// # Returns
    /// `false` if the recipient was not subscribed.
    pub fn remove(&self, recipient: RecipientId) -> bool {
        self.write().remove(&recipient).is_some()
    }

    pub fn contains(&self, recipient: RecipientId) -> bool {
        self.read().contains_key(&recipient)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy the current members.
    pub fn snapshot(&self) -> Snapshot {
        let mut members: Vec<Subscription> = self
            .read()
            .iter()
            .map(|(recipient, deliver)| Subscription {
                recipient: *recipient,
                deliver: Arc::clone(deliver),
            })
            .collect();
        members.sort_by_key(|s| s.recipient);
        Snapshot { members }
    }

    /// Current recipient ids, ordered.
    pub fn ids(&self) -> Vec<RecipientId> {
        self.snapshot().ids()
    }

    /// Snapshot the registry, then run `f` for every member concurrently.
    ///
    /// Each call is independent; a slow member does not hold up the others
    /// starting, and outcomes are returned in snapshot order.
    pub async fn for_each_snapshot<F, Fut, T>(&self, f: F) -> Vec<T>
    where
        F: FnMut(Subscription) -> Fut,
        Fut: Future<Output = T>,
    {
        join_all(self.snapshot().into_iter().map(f)).await
    }
}
