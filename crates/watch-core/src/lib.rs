//! Core types and traits for the market watcher.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (DailySeries, MarketUpdate)
//! - Chat identity and message types
//! - Core traits for data providers, transports, recipient storage and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{WatchError, WatchResult};
pub use types::*;
pub use traits::*;
