//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use watch_core::error::ScheduleError;
use watch_engine::Schedule;
use watch_indicators::{DivisorConvention, SummaryConfig, DEFAULT_LOOKBACK};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Rejected configuration values.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("market_data.symbols must name at least one symbol")]
    NoSymbols,

    #[error("market_data.symbols contains a blank entry")]
    BlankSymbol,

    #[error("indicators.lookback must be at least 1")]
    ZeroLookback,

    #[error("schedule: {0}")]
    Schedule(#[from] ScheduleError),
}

impl AppConfig {
    /// Check values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.market_data.symbols.is_empty() {
            return Err(SettingsError::NoSymbols);
        }
        if self.market_data.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(SettingsError::BlankSymbol);
        }
        if self.indicators.lookback == 0 {
            return Err(SettingsError::ZeroLookback);
        }
        self.schedule()?;
        Ok(())
    }

    /// Parsed poll schedule.
    pub fn schedule(&self) -> Result<Schedule, ScheduleError> {
        Schedule::new(&self.schedule.cron, &self.schedule.timezone)
    }

    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            lookback: self.indicators.lookback,
            divisor: self.indicators.divisor,
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "market-watch".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Also write logs to a daily-rolling file at this path
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// Market data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub symbols: Vec<String>,
    /// Fetch display names for symbols
    pub lookup_names: bool,
}

impl MarketDataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ALPHA_VANTAGE_API_KEY".to_string(),
            base_url: "https://www.alphavantage.co/query".to_string(),
            timeout_secs: 30,
            symbols: vec!["VGK".to_string(), "VOO".to_string()],
            lookup_names: true,
        }
    }
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    /// Environment variable holding the bot token
    pub token_env: String,
    pub base_url: String,
    pub poll_timeout_secs: u64,
}

impl TelegramSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            token_env: "TELEGRAM_ACCESS_TOKEN".to_string(),
            base_url: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
        }
    }
}

/// Poll schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub cron: String,
    pub timezone: String,
    pub run_on_startup: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            cron: "0 0 9 * * ?".to_string(),
            timezone: "Europe/London".to_string(),
            run_on_startup: true,
        }
    }
}

/// Indicator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub lookback: usize,
    pub divisor: DivisorConvention,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            divisor: DivisorConvention::Lookback,
        }
    }
}

/// Subscriber persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub recipients_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            recipients_path: "/data/chatIds".to_string(),
        }
    }
}
