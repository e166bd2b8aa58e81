//! Portfolio domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::portfolios_constants::{DEFAULT_BENCHMARK, DEFAULT_RISK_FREE_RATE};
use crate::errors::{Error, Result, ValidationError};
use crate::fx::Currency;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// Domain model representing a portfolio in the system.
///
/// A portfolio owns its positions, transactions, watchlist entries and
/// alerts; deleting it removes everything it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub base_currency: Currency,
    /// Ticker the performance metrics compare against (beta, relative TWR)
    pub benchmark: String,
    /// Annual risk-free rate used by Sharpe/Sortino, as a fraction
    #[serde(with = "decimal_serde")]
    pub risk_free_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub base_currency: Currency,
    pub benchmark: Option<String>,
    #[serde(default, with = "decimal_serde_option")]
    pub risk_free_rate: Option<Decimal>,
}

impl NewPortfolio {
    /// Validates the new portfolio data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio name cannot be empty".to_string(),
            )));
        }
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio user id cannot be empty".to_string(),
            )));
        }
        if let Some(benchmark) = &self.benchmark {
            if benchmark.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Benchmark ticker cannot be empty".to_string(),
                )));
            }
        }
        validate_risk_free_rate(self.risk_free_rate)
    }

    /// Benchmark to persist, falling back to the default
    pub fn benchmark_or_default(&self) -> String {
        self.benchmark
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string())
    }

    /// Risk-free rate to persist, falling back to the default
    pub fn risk_free_rate_or_default(&self) -> Decimal {
        self.risk_free_rate.unwrap_or(DEFAULT_RISK_FREE_RATE)
    }
}

/// Input model for updating an existing portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: String,
    pub name: Option<String>,
    pub benchmark: Option<String>,
    #[serde(default, with = "decimal_serde_option")]
    pub risk_free_rate: Option<Decimal>,
}

impl PortfolioUpdate {
    /// Validates the portfolio update data
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio ID is required for updates".to_string(),
            )));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Portfolio name cannot be empty".to_string(),
                )));
            }
        }
        if let Some(benchmark) = &self.benchmark {
            if benchmark.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Benchmark ticker cannot be empty".to_string(),
                )));
            }
        }
        validate_risk_free_rate(self.risk_free_rate)
    }
}

fn validate_risk_free_rate(rate: Option<Decimal>) -> Result<()> {
    if let Some(rate) = rate {
        if rate < Decimal::ZERO || rate >= dec!(1) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Risk-free rate must be within [0, 1), got {}",
                rate
            ))));
        }
    }
    Ok(())
}
