//! Subscriber registry, event bus and scheduled poller.
//!
//! The registry is the only shared mutable state. The poller produces
//! market updates on a cron schedule and hands them to the bus, which
//! fans each one out to a snapshot of the registry.

pub mod bus;
pub mod commands;
pub mod poller;
pub mod registry;
pub mod schedule;
pub mod service;

pub use bus::{MarketEventBus, PublishReport};
pub use commands::{Command, CommandHandler};
pub use poller::{poll_date, CycleReport, Poller, PollerState, SymbolFailure};
pub use registry::{Snapshot, SubscriberRegistry, Subscription};
pub use schedule::Schedule;
pub use service::{ServiceSettings, WatchService};

#[cfg(test)]
pub(crate) mod testing;
