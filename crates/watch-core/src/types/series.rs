//! Daily close-price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closing prices for one symbol keyed by trading date.
///
/// Only actual trading days are present, so weekends and holidays show up
/// as gaps between keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySeries {
    /// Ticker symbol
    pub symbol: String,
    /// Human-readable instrument name, if the provider knows one
    pub name: Option<String>,
    closes: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    /// Create an empty series for a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            closes: BTreeMap::new(),
        }
    }

    /// Build a series from (date, close) pairs.
    pub fn from_closes(
        symbol: impl Into<String>,
        closes: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            closes: closes.into_iter().collect(),
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Record the close for a trading date, replacing any previous value.
    pub fn insert(&mut self, date: NaiveDate, close: f64) -> Option<f64> {
        self.closes.insert(date, close)
    }

    /// Closing price on a date, if it was a trading day.
    #[inline]
    pub fn close(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    /// Check whether a date is a trading day in this series.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.closes.contains_key(&date)
    }

    /// Number of trading days.
    #[inline]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Oldest trading date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next().copied()
    }

    /// Most recent trading date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next_back().copied()
    }

    /// Latest trading date strictly before `date`.
    pub fn date_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.closes.range(..date).next_back().map(|(d, _)| *d)
    }

    /// Number of trading days on or before `date`.
    pub fn count_through(&self, date: NaiveDate) -> usize {
        self.closes.range(..=date).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_series_basics() {
        let series = DailySeries::from_closes("VOO", [(date(5), 10.0), (date(2), 9.0), (date(8), 11.0)]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(date(2)));
        assert_eq!(series.last_date(), Some(date(8)));
        assert_eq!(series.close(date(5)), Some(10.0));
        assert!(!series.contains(date(6)));
    }

    #[test]
    fn test_date_before_skips_gaps() {
        let series = DailySeries::from_closes("VGK", [(date(1), 1.0), (date(5), 2.0)]);

        assert_eq!(series.date_before(date(5)), Some(date(1)));
        assert_eq!(series.date_before(date(3)), Some(date(1)));
        assert_eq!(series.date_before(date(1)), None);
        assert_eq!(series.count_through(date(4)), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut series = DailySeries::new("VOO").with_name("Vanguard S&P 500 ETF");
        assert!(series.insert(date(3), 1.0).is_none());
        assert_eq!(series.insert(date(3), 2.0), Some(1.0));
        assert_eq!(series.close(date(3)), Some(2.0));
        assert_eq!(series.name.as_deref(), Some("Vanguard S&P 500 ETF"));
    }
}
