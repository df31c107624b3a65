//! Alpha Vantage response decoding.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use watch_core::error::DataError;
use watch_core::types::DailySeries;

/// Error fields Alpha Vantage returns with HTTP 200.
#[derive(Debug, Default, Deserialize)]
struct ApiNotice {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl ApiNotice {
    fn into_error(self, symbol: &str) -> Option<DataError> {
        if let Some(msg) = self.error_message {
            return Some(if msg.contains("Invalid API call") {
                DataError::SymbolNotFound(symbol.to_string())
            } else {
                DataError::Provider(msg)
            });
        }
        // Both are used for throttling and plan limits.
        self.note.or(self.information).map(DataError::RateLimited)
    }
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Meta Data")]
    meta: Option<MetaData>,
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, DailyBar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<SymbolMatch>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

/// Decode a `TIME_SERIES_DAILY` body into a series of closes.
pub fn parse_daily_series(requested: &str, body: &str) -> Result<DailySeries, DataError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    let raw = match response.series {
        Some(raw) => raw,
        None => {
            return Err(response
                .notice
                .into_error(requested)
                .unwrap_or_else(|| DataError::NoDataAvailable(requested.to_string())))
        }
    };

    let symbol = response
        .meta
        .map(|m| m.symbol)
        .unwrap_or_else(|| requested.to_string());
    let mut series = DailySeries::new(symbol);

    for (date, bar) in raw {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| DataError::ParseError(format!("bad date '{}': {}", date, e)))?;
        let close: f64 = bar
            .close
            .trim()
            .parse()
            .map_err(|_| DataError::ParseError(format!("bad close '{}' on {}", bar.close, date)))?;
        series.insert(date, close);
    }

    Ok(series)
}

/// Decode a `SYMBOL_SEARCH` body into the name of the best match.
///
/// The first match whose symbol equals `symbol` wins; otherwise the first
/// match is used.
pub fn parse_symbol_name(symbol: &str, body: &str) -> Result<Option<String>, DataError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    let matches = match response.best_matches {
        Some(matches) => matches,
        None => return response.notice.into_error(symbol).map_or(Ok(None), Err),
    };

    let name = matches
        .iter()
        .find(|m| m.symbol.eq_ignore_ascii_case(symbol))
        .or_else(|| matches.first())
        .map(|m| m.name.clone());
    Ok(name)
}
