use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

use super::market_data_constants::{DATA_SOURCE_MANUAL, DATA_SOURCE_YAHOO};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    #[serde(rename = "YAHOO")]
    Yahoo,
    #[serde(rename = "MANUAL")]
    Manual,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Yahoo => DATA_SOURCE_YAHOO,
            DataSource::Manual => DATA_SOURCE_MANUAL,
        }
    }
}

/// Latest market value of a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    /// Absolute change versus the previous close.
    #[serde(with = "decimal_serde")]
    pub change: Decimal,
    #[serde(with = "decimal_serde")]
    pub change_percent: Decimal,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Close the change was measured against.
    pub fn previous_close(&self) -> Decimal {
        self.price - self.change
    }
}

/// One OHLCV bar. `date` carries the full instant so intraday
/// intervals keep their resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_serde")]
    pub open: Decimal,
    #[serde(with = "decimal_serde")]
    pub high: Decimal,
    #[serde(with = "decimal_serde")]
    pub low: Decimal,
    #[serde(with = "decimal_serde")]
    pub close: Decimal,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalData {
    pub ticker: String,
    pub candles: Vec<Candle>,
}

impl HistoricalData {
    /// Collapses the candle series to one close per calendar day,
    /// keeping the last close when several candles share a day.
    pub fn daily_closes(&self) -> BTreeMap<NaiveDate, Decimal> {
        let mut closes = BTreeMap::new();
        for candle in &self.candles {
            closes.insert(candle.date.date_naive(), candle.close);
        }
        closes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub ticker: String,
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Descriptive fields for a ticker, as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerProfile {
    pub ticker: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl HistoryRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
            HistoryRange::FiveYears => "5y",
        }
    }

    /// Cache freshness per range. Short ranges move fast and expire
    /// quickly, long ranges barely change intraday.
    pub fn cache_ttl(&self) -> Duration {
        let secs = match self {
            HistoryRange::OneDay => 300,
            HistoryRange::FiveDays => 900,
            HistoryRange::OneMonth => 1800,
            HistoryRange::SixMonths => 3600,
            HistoryRange::OneYear => 7200,
            HistoryRange::FiveYears => 14400,
        };
        Duration::from_secs(secs)
    }

    /// Calendar-day span covered by the range, for providers that
    /// window a stored series instead of querying upstream.
    pub fn approx_days(&self) -> i64 {
        match self {
            HistoryRange::OneDay => 1,
            HistoryRange::FiveDays => 7,
            HistoryRange::OneMonth => 31,
            HistoryRange::SixMonths => 183,
            HistoryRange::OneYear => 366,
            HistoryRange::FiveYears => 1830,
        }
    }
}

impl FromStr for HistoryRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(HistoryRange::OneDay),
            "5d" => Ok(HistoryRange::FiveDays),
            "1mo" => Ok(HistoryRange::OneMonth),
            "6mo" => Ok(HistoryRange::SixMonths),
            "1y" => Ok(HistoryRange::OneYear),
            "5y" => Ok(HistoryRange::FiveYears),
            other => Err(format!("Unsupported history range: {}", other)),
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
}

impl HistoryInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::OneMinute => "1m",
            HistoryInterval::FiveMinutes => "5m",
            HistoryInterval::OneHour => "1h",
            HistoryInterval::OneDay => "1d",
        }
    }
}

impl fmt::Display for HistoryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuotesRequest {
    pub tickers: Vec<String>,
}

/// Per-ticker fetch failure inside an otherwise successful batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteError {
    pub ticker: String,
    #[serde(rename = "error")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuotesResponse {
    pub quotes: Vec<Quote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QuoteError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHistoryRequest {
    pub ticker: String,
    pub range: HistoryRange,
    #[serde(default)]
    pub interval: HistoryInterval,
}
