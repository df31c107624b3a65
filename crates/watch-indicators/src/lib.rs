//! Date-anchored technical indicators.
//!
//! This crate turns a daily close series into a market summary:
//! - Trading calendar walks (anchor resolution, previous trading day)
//! - Simple moving average
//! - Relative strength index
//! - Summary rendering into a `MarketUpdate`
//!
//! Every indicator starts at an anchor date and walks backward through
//! trading days, so weekends and holidays never count toward the window.

pub mod calendar;
pub mod momentum;
pub mod moving_average;
pub mod summary;

pub use calendar::{previous_trading_day, resolve_anchor, MAX_LOOKBACK_DAYS};
pub use momentum::Rsi;
pub use moving_average::Sma;
pub use summary::{MarketSummarizer, SummaryConfig};

use serde::{Deserialize, Serialize};

/// Default lookback window.
pub const DEFAULT_LOOKBACK: usize = 14;

/// Divisor used when averaging over the lookback window.
///
/// Both indicators take `N + 1` samples. `Lookback` divides by `N`, which is
/// the long-standing output of this bot; `SampleCount` divides by the number
/// of samples actually taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisorConvention {
    #[default]
    Lookback,
    SampleCount,
}

impl DivisorConvention {
    /// Divisor for a window of `period` that took `samples` samples.
    #[inline]
    pub fn divisor(self, period: usize, samples: usize) -> f64 {
        match self {
            DivisorConvention::Lookback => period as f64,
            DivisorConvention::SampleCount => samples as f64,
        }
    }
}

/// Round to 2 decimal places, ties to even.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
