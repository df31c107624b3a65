//! Alpha Vantage market data provider.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use watch_core::error::DataError;
use watch_core::traits::MarketDataProvider;
use watch_core::types::DailySeries;

use crate::response::{parse_daily_series, parse_symbol_name};

/// Alpha Vantage API configuration.
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co/query";

    /// Create config directly with an API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load the API key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self, DataError> {
        let api_key = std::env::var(var)
            .map_err(|_| DataError::Provider(format!("{} not set", var)))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Alpha Vantage client.
pub struct AlphaVantageProvider {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageProvider {
    /// Create a new client; every request is bounded by the configured timeout.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn query(&self, function: &str, params: &[(&str, &str)]) -> Result<String, DataError> {
        debug!("Alpha Vantage {} {:?}", function, params);

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[("function", function), ("apikey", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| request_error(function, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::Provider(format!("{}: {}", status, text)));
        }

        resp.text().await.map_err(|e| request_error(function, e))
    }
}

// The request URL carries the API key, so it never reaches the message.
fn request_error(function: &str, e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Timeout(function.to_string())
    } else {
        DataError::ConnectionError(e.without_url().to_string())
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries, DataError> {
        let body = self
            .query("TIME_SERIES_DAILY", &[("symbol", symbol), ("outputsize", "full")])
            .await?;
        let series = parse_daily_series(symbol, &body)?;
        debug!("Fetched {} daily closes for {}", series.len(), series.symbol);
        Ok(series)
    }

    async fn lookup_name(&self, symbol: &str) -> Result<Option<String>, DataError> {
        let body = self.query("SYMBOL_SEARCH", &[("keywords", symbol)]).await?;
        parse_symbol_name(symbol, &body)
    }

    fn name(&self) -> &str {
        "Alpha Vantage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = AlphaVantageConfig::new("demo".to_string())
            .with_base_url("http://localhost:9999/query")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://localhost:9999/query");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(AlphaVantageProvider::new(config).is_ok());
    }

    #[test]
    fn test_from_env_missing() {
        let err = AlphaVantageConfig::from_env("WATCH_TEST_UNSET_ALPHA_VANTAGE_KEY").unwrap_err();
        assert!(err.to_string().contains("WATCH_TEST_UNSET_ALPHA_VANTAGE_KEY not set"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let config = AlphaVantageConfig::new("demo".to_string())
            .with_base_url("http://127.0.0.1:9/query")
            .with_timeout(Duration::from_secs(2));
        let provider = AlphaVantageProvider::new(config).unwrap();

        let err = provider.fetch_daily_series("VOO").await.unwrap_err();
        assert!(matches!(err, DataError::ConnectionError(_) | DataError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_request_errors_hide_api_key() {
        let config = AlphaVantageConfig::new("SUPERSECRETKEY".to_string())
            .with_base_url("http://127.0.0.1:9/query")
            .with_timeout(Duration::from_secs(2));
        let provider = AlphaVantageProvider::new(config).unwrap();

        let err = provider.fetch_daily_series("VOO").await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));

        let err = provider.lookup_name("VOO").await.unwrap_err();
        let err = watch_core::error::WatchError::from(err);
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }
}
