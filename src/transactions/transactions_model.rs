//! Transaction domain models.
//!
//! Transactions are an immutable ledger: entries are created and read,
//! never edited. The only way an entry disappears is the cascade when its
//! portfolio is deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::fx::Currency;
use crate::positions::validate_ticker;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Fee,
    Deposit,
    Withdrawal,
}

impl TransactionType {
    /// True for entry kinds that reference an instrument rather than the
    /// cash balance.
    pub fn references_instrument(&self) -> bool {
        !matches!(self, TransactionType::Deposit | TransactionType::Withdrawal)
    }
}

/// Domain model representing one immutable ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    /// Link to the position at creation time, if one existed
    pub position_id: Option<String>,
    /// Ticker recorded at creation so the entry outlives its position
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    pub currency: Currency,
    #[serde(with = "decimal_serde")]
    pub fees: Decimal,
    pub notes: Option<String>,
    /// `quantity × price ± fees` per the portfolio's sign conventions,
    /// fixed at creation
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub position_id: Option<String>,
    /// Fallback instrument reference when no position id is given (or the
    /// position is gone by the time the entry is read)
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    pub currency: Currency,
    #[serde(default, with = "decimal_serde_option")]
    pub fees: Option<Decimal>,
    pub notes: Option<String>,
}

impl CreateTransactionRequest {
    /// Ticker trimmed and uppercased, when one was provided.
    pub fn normalized_ticker(&self) -> Option<String> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    }

    /// Fees with the absent case collapsed to zero.
    pub fn fees_or_zero(&self) -> Decimal {
        self.fees.unwrap_or(Decimal::ZERO)
    }

    /// Validates the new ledger entry data
    pub fn validate(&self) -> Result<()> {
        if matches!(
            self.transaction_type,
            TransactionType::Buy | TransactionType::Sell
        ) && self.quantity <= Decimal::ZERO
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{:?} requires a positive quantity, got {}",
                self.transaction_type, self.quantity
            ))));
        }
        if self.quantity < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Quantity cannot be negative, got {}",
                self.quantity
            ))));
        }
        if self.price < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Price cannot be negative, got {}",
                self.price
            ))));
        }
        if self.fees_or_zero() < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Fees cannot be negative, got {}",
                self.fees_or_zero()
            ))));
        }
        if let Some(ticker) = self.normalized_ticker() {
            validate_ticker(&ticker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            position_id: None,
            ticker: Some("AAPL".to_string()),
            transaction_type: TransactionType::Buy,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            quantity: dec!(50),
            price: dec!(150),
            currency: Currency::USD,
            fees: Some(dec!(1.5)),
            notes: None,
        }
    }

    #[test]
    fn buy_requires_positive_quantity() {
        let mut request = buy_request();
        assert!(request.validate().is_ok());

        request.quantity = dec!(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn deposit_accepts_zero_quantity_but_not_negative_amounts() {
        let mut request = buy_request();
        request.transaction_type = TransactionType::Deposit;
        request.ticker = None;
        request.quantity = dec!(0);
        assert!(request.validate().is_ok());

        request.price = dec!(-1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn serializes_type_field_name() {
        let request = buy_request();
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"BUY\""));
    }

    #[test]
    fn missing_fees_default_to_zero() {
        let json = r#"{
            "ticker": "AAPL",
            "type": "SELL",
            "date": "2024-03-01",
            "quantity": "10",
            "price": "100",
            "currency": "USD"
        }"#;
        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.fees_or_zero(), dec!(0));
        assert_eq!(request.position_id, None);
    }
}
