//! Market data provider and recipient storage.

mod alpha_vantage;
mod recipient_file;
mod response;

pub use alpha_vantage::{AlphaVantageConfig, AlphaVantageProvider};
pub use recipient_file::RecipientFile;
pub use response::{parse_daily_series, parse_symbol_name};
