//! Core data types for the market watcher.

mod message;
mod series;
mod update;

pub use message::{InboundMessage, OutboundMessage, RecipientId, ReplyKeyboard, TextFormat};
pub use series::DailySeries;
pub use update::MarketUpdate;
