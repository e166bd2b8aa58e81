//! Position domain models.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::fx::Currency;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

lazy_static! {
    /// Ticker symbols as Yahoo understands them: uppercase letters and
    /// digits plus the separators used by exchange suffixes (BRK.B),
    /// crypto pairs (BTC-USD), FX pairs (EURUSD=X) and indices (^GSPC)
    static ref TICKER_REGEX: Regex =
        Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,19}$").expect("Invalid regex pattern");
}

/// Validates a normalized (trimmed, uppercased) ticker symbol.
pub fn validate_ticker(ticker: &str) -> Result<()> {
    if ticker.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "ticker".to_string(),
        )));
    }
    if !TICKER_REGEX.is_match(ticker) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid ticker symbol '{}'",
            ticker
        ))));
    }
    Ok(())
}

/// Asset class of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[default]
    Equity,
    Etf,
    Crypto,
    Fund,
    Bond,
    Commodity,
    Other,
}

/// Domain model representing a position (a holding of one instrument)
/// within a portfolio.
///
/// State fields describe what the investor holds; the market block below
/// them caches the latest revaluation and is cleared whenever quantity or
/// average cost change, so stale figures are never served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub name: Option<String>,
    pub asset_type: AssetType,
    pub currency: Currency,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    pub broker: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
    /// `quantity × avg_cost`, maintained on every state change
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,

    // --- Market valuation block (filled by revaluation) ---
    #[serde(default, with = "decimal_serde_option")]
    pub current_price: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub current_value: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub unrealized_pnl: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub unrealized_pnl_percent: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub daily_change: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub daily_change_percent: Option<Decimal>,
    /// Share of total portfolio value, percent. Only set when every
    /// position of the portfolio is priced.
    #[serde(default, with = "decimal_serde_option")]
    pub weight: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub volatility_30d: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub volatility_90d: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub beta: Option<Decimal>,
    pub last_price_update: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionRequest {
    pub ticker: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    pub currency: Currency,
    pub name: Option<String>,
    #[serde(default)]
    pub asset_type: AssetType,
    pub broker: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl CreatePositionRequest {
    /// Ticker trimmed and uppercased, the form the position stores.
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }

    /// Validates the new position data
    pub fn validate(&self) -> Result<()> {
        validate_ticker(&self.normalized_ticker())?;
        if self.quantity <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Quantity must be positive, got {}",
                self.quantity
            ))));
        }
        if self.avg_cost < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Average cost cannot be negative, got {}",
                self.avg_cost
            ))));
        }
        Ok(())
    }
}

/// Input model for updating an existing position.
///
/// Only the provided fields change. A quantity or average-cost change
/// clears the market valuation block until the next revaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionRequest {
    #[serde(default, with = "decimal_serde_option")]
    pub quantity: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub avg_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePositionRequest {
    /// Validates the position update data
    pub fn validate(&self) -> Result<()> {
        if let Some(quantity) = self.quantity {
            if quantity <= Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Quantity must be positive, got {}",
                    quantity
                ))));
            }
        }
        if let Some(avg_cost) = self.avg_cost {
            if avg_cost < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Average cost cannot be negative, got {}",
                    avg_cost
                ))));
            }
        }
        Ok(())
    }

    /// True when the update touches quantity or average cost.
    pub fn changes_economics(&self) -> bool {
        self.quantity.is_some() || self.avg_cost.is_some()
    }
}
