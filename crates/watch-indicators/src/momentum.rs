//! Momentum indicators.

use chrono::NaiveDate;
use watch_core::error::IndicatorError;
use watch_core::traits::SeriesIndicator;
use watch_core::types::DailySeries;

use crate::calendar::{close_on, previous_trading_day};
use crate::{round2, DivisorConvention, DEFAULT_LOOKBACK};

/// Relative Strength Index (RSI).
///
/// Compares each close in the window with the trading day before it,
/// starting at the anchor, for `period + 1` steps. Flat steps count as
/// gains of zero.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    divisor: DivisorConvention,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        Self::with_divisor(period, DivisorConvention::default())
    }

    /// Create an RSI with an explicit divisor convention.
    pub fn with_divisor(period: usize, divisor: DivisorConvention) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period, divisor }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK)
    }
}

impl SeriesIndicator for Rsi {
    type Output = f64;

    fn compute(&self, series: &DailySeries, anchor: NaiveDate) -> Result<f64, IndicatorError> {
        self.validate_series(series, anchor)?;

        let mut current = anchor;
        let mut upward = 0.0;
        let mut downward = 0.0;
        let mut steps = 0;

        for _ in 0..=self.period {
            let prev = match previous_trading_day(series, current) {
                Ok(prev) => prev,
                // Validation guarantees `period` steps; only the last can run off the start.
                Err(IndicatorError::HistoryExhausted { .. }) => break,
                Err(e) => return Err(e),
            };

            let prev_close = close_on(series, prev)?;
            let curr_close = close_on(series, current)?;
            if prev_close <= curr_close {
                upward += curr_close - prev_close;
            } else {
                downward += prev_close - curr_close;
            }

            steps += 1;
            current = prev;
        }

        let divisor = self.divisor.divisor(self.period, steps);
        let average_gain = upward / divisor;
        let average_loss = downward / divisor;

        if average_loss == 0.0 {
            return Ok(100.0);
        }

        let relative_strength = average_gain / average_loss;
        Ok(round2(100.0 - 100.0 / (1.0 + relative_strength)))
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
