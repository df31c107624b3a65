//! Market data provider trait.

use crate::error::DataError;
use crate::types::DailySeries;
use async_trait::async_trait;

/// Source of daily price history.
///
/// Implementations must bound every request with a timeout; a hung
/// provider would otherwise stall the poll cycle.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the full daily close history for a symbol as of now.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries, DataError>;

    /// Look up a human-readable name for a symbol.
    async fn lookup_name(&self, _symbol: &str) -> Result<Option<String>, DataError> {
        Ok(None)
    }

    /// Get the provider name.
    fn name(&self) -> &str;
}
