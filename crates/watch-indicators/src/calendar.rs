//! Trading calendar walks over a daily series.

use chrono::NaiveDate;
use watch_core::error::IndicatorError;
use watch_core::types::DailySeries;

/// Maximum number of calendar days searched backward for a trading day.
pub const MAX_LOOKBACK_DAYS: u32 = 30;

/// Resolve the most recent trading date on or before `target`.
///
/// Walks backward one calendar day at a time, giving up after
/// [`MAX_LOOKBACK_DAYS`] steps.
pub fn resolve_anchor(series: &DailySeries, target: NaiveDate) -> Result<NaiveDate, IndicatorError> {
    let mut date = target;
    for _ in 0..=MAX_LOOKBACK_DAYS {
        if series.contains(date) {
            return Ok(date);
        }
        date = match date.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    Err(IndicatorError::NoData {
        from: target,
        searched_days: MAX_LOOKBACK_DAYS,
    })
}

/// Find the trading day immediately before `date`.
///
/// Same result as walking backward a day at a time with the
/// [`MAX_LOOKBACK_DAYS`] bound, without the per-day lookups.
pub fn previous_trading_day(series: &DailySeries, date: NaiveDate) -> Result<NaiveDate, IndicatorError> {
    let prev = series
        .date_before(date)
        .ok_or(IndicatorError::HistoryExhausted { before: date })?;

    if (date - prev).num_days() > i64::from(MAX_LOOKBACK_DAYS) {
        return Err(IndicatorError::NoData {
            from: date,
            searched_days: MAX_LOOKBACK_DAYS,
        });
    }
    Ok(prev)
}

/// Close on a date that must be a trading day.
pub(crate) fn close_on(series: &DailySeries, date: NaiveDate) -> Result<f64, IndicatorError> {
    series.close(date).ok_or_else(|| {
        IndicatorError::InvalidParameter(format!("{} is not a trading day for {}", date, series.symbol))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekdays_only() -> DailySeries {
        // Thu 4th, Fri 5th, Mon 8th, Tue 9th of January 2024
        DailySeries::from_closes(
            "VOO",
            [
                (date(2024, 1, 4), 1.0),
                (date(2024, 1, 5), 2.0),
                (date(2024, 1, 8), 3.0),
                (date(2024, 1, 9), 4.0),
            ],
        )
    }

    #[test]
    fn test_anchor_on_trading_day() {
        let series = weekdays_only();
        assert_eq!(resolve_anchor(&series, date(2024, 1, 9)).unwrap(), date(2024, 1, 9));
    }

    #[test]
    fn test_anchor_walks_over_weekend() {
        let series = weekdays_only();
        assert_eq!(resolve_anchor(&series, date(2024, 1, 7)).unwrap(), date(2024, 1, 5));
    }

    #[test]
    fn test_anchor_empty_series() {
        let series = DailySeries::new("VOO");
        assert_eq!(
            resolve_anchor(&series, date(2024, 1, 9)),
            Err(IndicatorError::NoData {
                from: date(2024, 1, 9),
                searched_days: MAX_LOOKBACK_DAYS
            })
        );
    }

    #[test]
    fn test_anchor_bound() {
        let series = weekdays_only();
        // exactly 30 days after the last close still resolves
        assert_eq!(resolve_anchor(&series, date(2024, 2, 8)).unwrap(), date(2024, 1, 9));
        assert!(matches!(
            resolve_anchor(&series, date(2024, 2, 9)),
            Err(IndicatorError::NoData { .. })
        ));
    }

    #[test]
    fn test_previous_trading_day() {
        let series = weekdays_only();
        assert_eq!(previous_trading_day(&series, date(2024, 1, 8)).unwrap(), date(2024, 1, 5));
        assert_eq!(
            previous_trading_day(&series, date(2024, 1, 4)),
            Err(IndicatorError::HistoryExhausted { before: date(2024, 1, 4) })
        );
    }

    #[test]
    fn test_previous_trading_day_gap_too_wide() {
        let series = DailySeries::from_closes("VGK", [(date(2024, 1, 1), 1.0), (date(2024, 3, 1), 2.0)]);
        assert!(matches!(
            previous_trading_day(&series, date(2024, 3, 1)),
            Err(IndicatorError::NoData { .. })
        ));
    }
}
