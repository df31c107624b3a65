//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::DailySeries;
use chrono::NaiveDate;

/// Trait for technical indicators evaluated at a single anchor date.
///
/// Indicators walk backward through trading days from the anchor, so
/// gaps in the calendar are skipped rather than treated as missing data.
pub trait SeriesIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Evaluate the indicator with `anchor` as the most recent trading day.
    ///
    /// # Arguments
    /// * `series` - Close prices keyed by trading date
    /// * `anchor` - A date present in `series`
    fn compute(&self, series: &DailySeries, anchor: NaiveDate) -> Result<Self::Output, IndicatorError>;

    /// Get the lookback window.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Trading days needed on or before the anchor.
    fn required_days(&self) -> usize {
        self.period() + 1
    }

    /// Validate that there's enough history up to the anchor.
    fn validate_series(&self, series: &DailySeries, anchor: NaiveDate) -> Result<(), IndicatorError> {
        let available = series.count_through(anchor);
        if available < self.required_days() {
            return Err(IndicatorError::InsufficientHistory {
                required: self.required_days(),
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LastClose {
        period: usize,
    }

    impl SeriesIndicator for LastClose {
        type Output = f64;

        fn compute(&self, series: &DailySeries, anchor: NaiveDate) -> Result<f64, IndicatorError> {
            self.validate_series(series, anchor)?;
            series
                .close(anchor)
                .ok_or(IndicatorError::HistoryExhausted { before: anchor })
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "last"
        }
    }

    #[test]
    fn test_series_validation() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        let series = DailySeries::from_closes("T", [(d(1), 1.0), (d(2), 2.0), (d(5), 3.0)]);
        let indicator = LastClose { period: 2 };

        assert_eq!(indicator.compute(&series, d(5)).unwrap(), 3.0);
        assert_eq!(
            indicator.compute(&series, d(2)),
            Err(IndicatorError::InsufficientHistory { required: 3, available: 2 })
        );
    }
}
