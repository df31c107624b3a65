//! Command implementations.

pub mod once;
pub mod run;
pub mod subscribers;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use watch_config::{load_config, AppConfig};
use watch_core::traits::MarketDataProvider;
use watch_data::{AlphaVantageConfig, AlphaVantageProvider};

/// Load and validate the configuration file.
pub(crate) fn load_valid_config(config_path: &Path) -> Result<AppConfig> {
    let config = load_config(config_path).with_context(|| format!("Failed to load {:?}", config_path))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Market data provider from config; the API key comes from the environment.
pub(crate) fn market_data(config: &AppConfig) -> Result<Arc<dyn MarketDataProvider>> {
    let settings = &config.market_data;
    let provider_config = AlphaVantageConfig::from_env(&settings.api_key_env)?
        .with_base_url(&settings.base_url)
        .with_timeout(settings.timeout());
    Ok(Arc::new(AlphaVantageProvider::new(provider_config)?))
}
