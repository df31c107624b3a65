//! Moving average indicators.

use chrono::NaiveDate;
use watch_core::error::IndicatorError;
use watch_core::traits::SeriesIndicator;
use watch_core::types::DailySeries;

use crate::calendar::{close_on, previous_trading_day};
use crate::{round2, DivisorConvention, DEFAULT_LOOKBACK};

/// Simple Moving Average (SMA).
///
/// Sums the anchor close and the `period` trading closes before it, then
/// divides according to the configured [`DivisorConvention`]. Output is
/// rounded to 2 decimal places.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    divisor: DivisorConvention,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        Self::with_divisor(period, DivisorConvention::default())
    }

    /// Create an SMA with an explicit divisor convention.
    pub fn with_divisor(period: usize, divisor: DivisorConvention) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period, divisor }
    }
}

impl Default for Sma {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK)
    }
}

impl SeriesIndicator for Sma {
    type Output = f64;

    fn compute(&self, series: &DailySeries, anchor: NaiveDate) -> Result<f64, IndicatorError> {
        self.validate_series(series, anchor)?;

        let samples = self.period + 1;
        let mut date = anchor;
        let mut sum = 0.0;

        for i in 0..samples {
            sum += close_on(series, date)?;
            if i + 1 < samples {
                date = previous_trading_day(series, date)?;
            }
        }

        Ok(round2(sum / self.divisor.divisor(self.period, samples)))
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn consecutive(start: NaiveDate, closes: &[f64]) -> DailySeries {
        DailySeries::from_closes(
            "TEST",
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (start.checked_add_days(Days::new(i as u64)).unwrap(), c)),
        )
    }

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_sma_divides_by_lookback() {
        let closes: Vec<f64> = (10..=24).map(f64::from).collect();
        let series = consecutive(jan(1), &closes);

        // 15 samples summing to 255, divided by 14
        let sma = Sma::new(14).compute(&series, jan(15)).unwrap();
        assert_eq!(sma, 18.21);
    }

    #[test]
    fn test_sma_sample_count_divisor() {
        let closes: Vec<f64> = (10..=24).map(f64::from).collect();
        let series = consecutive(jan(1), &closes);

        let sma = Sma::with_divisor(14, DivisorConvention::SampleCount)
            .compute(&series, jan(15))
            .unwrap();
        assert_eq!(sma, 17.0);
    }

    #[test]
    fn test_sma_skips_gaps() {
        // Fri 5th, Mon 8th, Tue 9th
        let series = DailySeries::from_closes("TEST", [(jan(5), 12.0), (jan(8), 11.0), (jan(9), 13.0)]);

        let sma = Sma::new(2).compute(&series, jan(9)).unwrap();
        assert_eq!(sma, 18.0);
    }

    #[test]
    fn test_sma_uses_only_window() {
        let series = consecutive(jan(1), &[1000.0, 1.0, 2.0, 3.0]);
        let sma = Sma::new(2).compute(&series, jan(4)).unwrap();
        assert_eq!(sma, 3.0);
    }

    #[test]
    fn test_sma_insufficient_history() {
        let series = consecutive(jan(1), &[1.0, 2.0, 3.0]);
        assert_eq!(
            Sma::new(5).compute(&series, jan(3)),
            Err(IndicatorError::InsufficientHistory { required: 6, available: 3 })
        );
    }

    #[test]
    fn test_sma_anchor_must_be_trading_day() {
        let series = DailySeries::from_closes("TEST", [(jan(1), 1.0), (jan(2), 2.0), (jan(4), 3.0)]);
        assert!(matches!(
            Sma::new(1).compute(&series, jan(3)),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_sma_zero_period() {
        Sma::new(0);
    }
}
