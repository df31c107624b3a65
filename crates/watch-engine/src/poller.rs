//! Scheduled market poller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use watch_core::error::WatchError;
use watch_core::traits::MarketDataProvider;
use watch_core::types::MarketUpdate;
use watch_indicators::MarketSummarizer;

use crate::bus::{MarketEventBus, PublishReport};
use crate::schedule::Schedule;

/// Poller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollerState {
    Idle,
    Firing,
}

/// A symbol that could not be summarized in a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Date the cycle polled for
    pub date: NaiveDate,
    /// Updates that were published, in symbol order
    pub updates: Vec<MarketUpdate>,
    /// Symbols skipped this cycle
    pub failures: Vec<SymbolFailure>,
    /// Delivery totals across all updates
    pub deliveries: PublishReport,
}

/// Fetches, summarizes and publishes each configured symbol.
pub struct Poller {
    provider: Arc<dyn MarketDataProvider>,
    bus: MarketEventBus,
    summarizer: MarketSummarizer,
    symbols: Vec<String>,
    lookup_names: bool,
    gate: Mutex<()>,
    firing: AtomicBool,
}

impl Poller {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        bus: MarketEventBus,
        summarizer: MarketSummarizer,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            provider,
            bus,
            summarizer,
            symbols,
            lookup_names: true,
            gate: Mutex::new(()),
            firing: AtomicBool::new(false),
        }
    }

    /// Look up display names for series the provider returns unnamed.
    pub fn with_name_lookup(mut self, enabled: bool) -> Self {
        self.lookup_names = enabled;
        self
    }

    pub fn state(&self) -> PollerState {
        if self.firing.load(Ordering::SeqCst) {
            PollerState::Firing
        } else {
            PollerState::Idle
        }
    }

    /// Run one cycle for `today`.
    ///
    /// # Returns
    /// `None` if a cycle was already running; the trigger is dropped.
    pub async fn fire(&self, today: NaiveDate) -> Option<CycleReport> {
        let _guard = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Poll for {} skipped, previous cycle still running", today);
                return None;
            }
        };

        self.firing.store(true, Ordering::SeqCst);
        let _idle = IdleOnDrop(&self.firing);
        Some(self.run_cycle(today).await)
    }

    async fn run_cycle(&self, today: NaiveDate) -> CycleReport {
        info!("Polling {} symbols for {}", self.symbols.len(), today);
        let mut report = CycleReport {
            date: today,
            updates: Vec::new(),
            failures: Vec::new(),
            deliveries: PublishReport::default(),
        };

        for symbol in &self.symbols {
            match self.build_update(symbol, today).await {
                Ok(update) => {
                    let delivered = self.bus.publish(&update).await;
                    report.deliveries.merge(delivered);
                    report.updates.push(update);
                }
                Err(e) => {
                    warn!("Skipping {} this cycle: {}", symbol, e);
                    report.failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Poll complete: {} published, {} skipped, {}/{} deliveries",
            report.updates.len(),
            report.failures.len(),
            report.deliveries.delivered,
            report.deliveries.attempted
        );
        report
    }

    /// Fetch and summarize one symbol without publishing it.
    pub async fn build_update(&self, symbol: &str, today: NaiveDate) -> Result<MarketUpdate, WatchError> {
        let mut series = self.provider.fetch_daily_series(symbol).await?;

        if self.lookup_names && series.name.is_none() {
            match self.provider.lookup_name(symbol).await {
                Ok(name) => series.name = name,
                Err(e) => debug!("No display name for {}: {}", symbol, e),
            }
        }

        Ok(self.summarizer.summarize(&series, today)?)
    }

    /// Fire on startup (optionally) and at every scheduled instant until
    /// `shutdown` turns true or its sender is dropped.
    ///
    /// A cycle in progress when shutdown arrives is dropped at its next
    /// await point. Instants that pass while a cycle runs are skipped.
    pub async fn run(&self, schedule: &Schedule, run_on_startup: bool, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow() {
            return;
        }

        if run_on_startup {
            let today = poll_date(Utc::now());
            tokio::select! {
                _ = self.fire(today) => {}
                _ = shutdown.changed() => {
                    info!("Poller stopped during startup poll");
                    return;
                }
            }
        }

        loop {
            let now = Utc::now();
            let Some(next) = schedule.next_after(now) else {
                warn!("Schedule '{}' has no upcoming fire time, poller stopping", schedule.expression());
                return;
            };
            info!("Next poll at {}", next.with_timezone(&schedule.timezone()));

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {
                    info!("Poller stopped");
                    return;
                }
            }

            let today = poll_date(Utc::now());
            tokio::select! {
                _ = self.fire(today) => {}
                _ = shutdown.changed() => {
                    info!("Poller stopped mid-cycle");
                    return;
                }
            }
        }
    }
}

/// The date a cycle fired at `now` polls for.
///
/// Always the UTC calendar date, whatever timezone the schedule runs in.
pub fn poll_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

struct IdleOnDrop<'a>(&'a AtomicBool);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
