use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for percentage figures (weights, returns)
pub const PERCENT_PRECISION: u32 = 4;

/// Trading days per year, used for annualizing daily statistics
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Day-count base for money-weighted return exponents
pub const DAYS_PER_YEAR: Decimal = dec!(365);
