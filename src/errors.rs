use std::num::ParseFloatError;
use thiserror::Error;

use crate::alerts::AlertError;
use crate::fx::FxError;
use crate::market_data::MarketDataError;
use crate::portfolios::PortfolioError;
use crate::positions::PositionError;
use crate::transactions::TransactionError;
use crate::watchlists::WatchlistError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Portfolio error: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Watchlist error: {0}")]
    Watchlist(#[from] WatchlistError),

    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Currency operation failed: {0}")]
    Currency(#[from] CurrencyError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("Failed to convert between currencies: {0}")]
    ConversionFailed(String),

    #[error("Currency '{0}' is not supported")]
    Unsupported(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// Implement From for rust_decimal::Error to Error directly
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

// Add From implementation for serde_json::Error
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

// Add From implementation for FxError
impl From<FxError> for Error {
    fn from(err: FxError) -> Self {
        Error::Currency(CurrencyError::ConversionFailed(err.to_string()))
    }
}
