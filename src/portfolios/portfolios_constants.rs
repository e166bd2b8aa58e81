use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Benchmark ticker applied when a new portfolio does not name one.
pub const DEFAULT_BENCHMARK: &str = "SPY";

/// Annual risk-free rate applied when a new portfolio does not set one.
pub const DEFAULT_RISK_FREE_RATE: Decimal = dec!(0.03);
