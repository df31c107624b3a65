//! Error types for the market watcher.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level market watcher error.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

/// Market data provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("No trading data within {searched_days} days before {from}")]
    NoData { from: NaiveDate, searched_days: u32 },

    #[error("Series has no trading day before {before}")]
    HistoryExhausted { before: NaiveDate },

    #[error("Insufficient data: need {required} trading days, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Chat transport errors.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Transport closed")]
    Closed,
}

/// Recipient storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recipient id on line {line}: '{content}'")]
    Parse { line: usize, content: String },
}

/// Schedule errors.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

/// Result type alias for market watcher operations.
pub type WatchResult<T> = Result<T, WatchError>;
