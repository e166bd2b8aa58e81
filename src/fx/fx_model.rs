use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CurrencyError;

/// Currencies a portfolio can be denominated in.
///
/// Market data may carry other codes (a Toronto listing quotes in
/// CAD); those stay free-form strings and are converted through the
/// FX service when aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::USD, Currency::EUR, Currency::GBP, Currency::JPY];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            other => Err(CurrencyError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange suffix to trading currency. Order matters only for
/// readability; the suffixes are mutually exclusive.
const EXCHANGE_CURRENCIES: &[(&str, &str)] = &[
    (".TO", "CAD"), // Toronto
    (".T", "JPY"),  // Tokyo
    (".DE", "EUR"), // Xetra
    (".PA", "EUR"), // Paris
    (".AM", "EUR"), // Amsterdam
    (".L", "GBP"),  // London
];

/// Currency a ticker trades in, inferred from its exchange suffix.
/// Unsuffixed tickers default to USD.
pub fn detect_currency(ticker: &str) -> &'static str {
    for (suffix, currency) in EXCHANGE_CURRENCIES {
        if ticker.ends_with(suffix) {
            return currency;
        }
    }
    "USD"
}
