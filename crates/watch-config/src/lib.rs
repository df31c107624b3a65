//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, IndicatorSettings, LogFormat, LoggingConfig, MarketDataConfig, ScheduleSettings,
    SettingsError, StorageSettings, TelegramSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `WATCH__SECTION__KEY` form and override
/// the file; `WATCH__MARKET_DATA__SYMBOLS` takes a comma-separated list.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("WATCH")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("market_data.symbols")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
