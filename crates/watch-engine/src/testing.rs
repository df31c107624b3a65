//! In-memory fakes for engine tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use watch_core::error::{DataError, StoreError, TransportError};
use watch_core::traits::{Deliver, MarketDataProvider, RecipientStore, Transport};
use watch_core::types::{DailySeries, InboundMessage, OutboundMessage, RecipientId};

#[derive(Default)]
pub struct RecordingDelivery {
    pub delivered: Mutex<Vec<OutboundMessage>>,
}

impl RecordingDelivery {
    pub fn texts(&self) -> Vec<String> {
        self.delivered.lock().unwrap().iter().map(|m| m.text.clone()).collect()
    }
}

#[async_trait]
impl Deliver for RecordingDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct FailingDelivery;

#[async_trait]
impl Deliver for FailingDelivery {
    async fn deliver(&self, _message: &OutboundMessage) -> Result<(), TransportError> {
        Err(TransportError::ApiError("Forbidden: bot was blocked by the user".to_string()))
    }
}

/// Transport that records sends and replays queued inbound batches.
#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<(RecipientId, OutboundMessage)>>,
    pub inbox: Mutex<VecDeque<Vec<InboundMessage>>>,
    pub fail_for: Mutex<Vec<RecipientId>>,
}

impl FakeTransport {
    pub fn queue(&self, batch: Vec<InboundMessage>) {
        self.inbox.lock().unwrap().push_back(batch);
    }

    pub fn sent_to(&self, recipient: RecipientId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == recipient)
            .map(|(_, m)| m.text.clone())
            .collect()
    }

    pub fn inbox_drained(&self) -> bool {
        self.inbox.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, recipient: RecipientId, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.fail_for.lock().unwrap().contains(&recipient) {
            return Err(TransportError::ApiError("chat not found".to_string()));
        }
        self.sent.lock().unwrap().push((recipient, message.clone()));
        Ok(())
    }

    async fn receive(&self, timeout: Duration) -> Result<Vec<InboundMessage>, TransportError> {
        let next = self.inbox.lock().unwrap().pop_front();
        match next {
            Some(batch) => Ok(batch),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(vec![])
            }
        }
    }

    async fn identity(&self) -> Result<String, TransportError> {
        Ok("MarketWatchBot".to_string())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub ids: Mutex<Vec<RecipientId>>,
    pub saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_ids(ids: &[i64]) -> Self {
        Self {
            ids: Mutex::new(ids.iter().copied().map(RecipientId).collect()),
            saves: Mutex::new(0),
        }
    }
}

#[async_trait]
impl RecipientStore for MemoryStore {
    async fn load(&self) -> Result<Vec<RecipientId>, StoreError> {
        Ok(self.ids.lock().unwrap().clone())
    }

    async fn save(&self, recipients: &[RecipientId]) -> Result<(), StoreError> {
        *self.ids.lock().unwrap() = recipients.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

/// Provider serving fixed series, with an optional gate to hold fetches open.
#[derive(Default)]
pub struct FakeProvider {
    pub series: HashMap<String, DailySeries>,
    pub names: HashMap<String, String>,
    pub fetches: Mutex<Vec<String>>,
    pub gate: Option<(Notify, Notify)>,
}

impl FakeProvider {
    pub fn with_series(mut self, series: DailySeries) -> Self {
        self.series.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_name(mut self, symbol: &str, name: &str) -> Self {
        self.names.insert(symbol.to_string(), name.to_string());
        self
    }

    /// Fetches signal the first notify, then wait on the second.
    pub fn gated(mut self) -> Self {
        self.gate = Some((Notify::new(), Notify::new()));
        self
    }

    pub async fn wait_entered(&self) {
        if let Some((entered, _)) = &self.gate {
            entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some((_, release)) = &self.gate {
            release.notify_one();
        }
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries, DataError> {
        self.fetches.lock().unwrap().push(symbol.to_string());
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    async fn lookup_name(&self, symbol: &str) -> Result<Option<String>, DataError> {
        Ok(self.names.get(symbol).cloned())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Consecutive daily closes 10, 11, ... ending on `last`.
pub fn ramp(symbol: &str, last: NaiveDate, days: usize) -> DailySeries {
    let closes = (0..days).map(|i| {
        let date = last - ChronoDuration::days((days - 1 - i) as i64);
        (date, 10.0 + i as f64)
    });
    DailySeries::from_closes(symbol, closes)
}
