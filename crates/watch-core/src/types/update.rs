//! Market update published to subscribers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed market summary for one symbol.
///
/// Constructed once per symbol per poll cycle; the rendered text is fixed
/// at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketUpdate {
    /// Ticker symbol
    pub symbol: String,
    /// Instrument display name
    pub name: Option<String>,
    /// Most recent trading date used as the anchor
    pub as_of: NaiveDate,
    /// Close on the anchor date
    pub close: f64,
    /// Lookback window
    pub lookback: usize,
    /// Simple moving average, rounded to 2dp
    pub sma: f64,
    /// Relative strength index, rounded to 2dp
    pub rsi: f64,
    message: String,
}

impl MarketUpdate {
    /// Create an update and render its message.
    pub fn new(
        symbol: impl Into<String>,
        name: Option<String>,
        as_of: NaiveDate,
        close: f64,
        lookback: usize,
        sma: f64,
        rsi: f64,
    ) -> Self {
        let mut update = Self {
            symbol: symbol.into(),
            name,
            as_of,
            close,
            lookback,
            sma,
            rsi,
            message: String::new(),
        };
        update.message = update.render();
        update
    }

    /// Markdown message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn render(&self) -> String {
        let header = match &self.name {
            Some(name) => format!("*{} ({})*", name, self.symbol),
            None => format!("*{}*", self.symbol),
        };
        format!(
            "{}\nClose on {}: {}\n{} period SMA: {}\n{} period RSI: {}",
            header,
            self.as_of.format("%Y-%m-%d"),
            self.close,
            self.lookback,
            self.sma,
            self.lookback,
            self.rsi,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_name() {
        let update = MarketUpdate::new(
            "VOO",
            Some("Vanguard S&P 500 ETF".to_string()),
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            487.5,
            14,
            480.12,
            63.4,
        );

        assert_eq!(
            update.message(),
            "*Vanguard S&P 500 ETF (VOO)*\nClose on 2024-05-17: 487.5\n14 period SMA: 480.12\n14 period RSI: 63.4"
        );
    }

    #[test]
    fn test_render_without_name() {
        let update = MarketUpdate::new(
            "VGK",
            None,
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            68.0,
            14,
            67.0,
            100.0,
        );

        assert!(update.message().starts_with("*VGK*\n"));
        assert!(update.message().ends_with("14 period RSI: 100"));
    }
}
