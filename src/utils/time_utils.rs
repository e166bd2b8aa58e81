use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::constants::DAYS_PER_YEAR;

/// Signed number of days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Fraction of a year between two dates on a 365-day count.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from(days_between(start, end)) / DAYS_PER_YEAR
}
