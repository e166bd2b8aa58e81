//! Watchlist domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::market_data::Quote;
use crate::positions::validate_ticker;
use crate::utils::decimal_serde::decimal_serde_option;

/// One watched ticker inside a portfolio, with the last quote snapshot
/// taken for it. The snapshot survives failed refreshes untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,

    // --- Last-known quote snapshot ---
    #[serde(default, with = "decimal_serde_option")]
    pub current_price: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub daily_change: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub daily_change_percent: Option<Decimal>,
    pub last_price_update: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    /// Overwrites the snapshot from a fresh quote.
    pub fn apply_quote(&mut self, quote: &Quote) {
        self.current_price = Some(quote.price);
        self.daily_change = Some(quote.change);
        self.daily_change_percent = Some(quote.change_percent);
        self.last_price_update = Some(quote.timestamp);
    }
}

/// Input model for adding a ticker to a watchlist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchlistEntryRequest {
    pub ticker: String,
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl AddWatchlistEntryRequest {
    /// Ticker trimmed and uppercased, the form the entry stores.
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }

    /// Validates the new entry data
    pub fn validate(&self) -> Result<()> {
        validate_ticker(&self.normalized_ticker())
    }
}
