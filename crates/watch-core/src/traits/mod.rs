//! Core traits for the market watcher.

mod indicator;
mod provider;
mod store;
mod transport;

pub use indicator::SeriesIndicator;
pub use provider::MarketDataProvider;
pub use store::RecipientStore;
pub use transport::{Deliver, Transport, TransportDelivery};
