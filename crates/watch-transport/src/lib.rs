//! Chat transports.

mod console;
mod telegram;

pub use console::ConsoleTransport;
pub use telegram::{TelegramConfig, TelegramTransport};
