//! Market summary for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use watch_core::error::IndicatorError;
use watch_core::traits::SeriesIndicator;
use watch_core::types::{DailySeries, MarketUpdate};

use crate::calendar::{close_on, resolve_anchor};
use crate::{DivisorConvention, Rsi, Sma, DEFAULT_LOOKBACK};

/// Summary parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Lookback window for both indicators
    pub lookback: usize,
    /// Averaging divisor
    pub divisor: DivisorConvention,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            divisor: DivisorConvention::Lookback,
        }
    }
}

/// Builds a [`MarketUpdate`] from a daily series.
#[derive(Debug, Clone)]
pub struct MarketSummarizer {
    lookback: usize,
    sma: Sma,
    rsi: Rsi,
}

impl MarketSummarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            lookback: config.lookback,
            sma: Sma::with_divisor(config.lookback, config.divisor),
            rsi: Rsi::with_divisor(config.lookback, config.divisor),
        }
    }

    /// Summarize `series` as of `today`.
    ///
    /// The anchor is the most recent trading day on or before `today`.
    pub fn summarize(&self, series: &DailySeries, today: NaiveDate) -> Result<MarketUpdate, IndicatorError> {
        let anchor = resolve_anchor(series, today)?;
        let close = close_on(series, anchor)?;
        let sma = self.sma.compute(series, anchor)?;
        let rsi = self.rsi.compute(series, anchor)?;

        Ok(MarketUpdate::new(
            series.symbol.clone(),
            series.name.clone(),
            anchor,
            close,
            self.lookback,
            sma,
            rsi,
        ))
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }
}

impl Default for MarketSummarizer {
    fn default() -> Self {
        Self::new(SummaryConfig::default())
    }
}
