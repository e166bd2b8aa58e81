//! Condition evaluation against a batch of quotes.
//!
//! Level conditions fire on a cross, not on a level: the previous close
//! has to sit on the other side of the target. An alert armed while the
//! price already satisfies the condition therefore waits for the next
//! actual move through the target instead of firing immediately.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::alerts_model::{Alert, AlertType};
use crate::market_data::Quote;

/// Decides whether an armed alert's condition holds for the given
/// quotes. `portfolio_change_percent` is the portfolio's daily move,
/// used by PERCENT_CHANGE alerts that watch no single ticker.
pub(crate) fn should_fire(
    alert: &Alert,
    quotes: &HashMap<String, Quote>,
    portfolio_change_percent: Option<Decimal>,
) -> bool {
    match alert.alert_type {
        AlertType::PercentChange => {
            let threshold = match alert.target_change_percent {
                Some(threshold) => threshold,
                None => return false,
            };
            let observed = match &alert.ticker {
                Some(ticker) => quotes.get(ticker).map(|q| q.change_percent),
                None => portfolio_change_percent,
            };
            observed.map_or(false, |change| change.abs() >= threshold)
        }
        AlertType::DropsBelow => level_inputs(alert, quotes)
            .map_or(false, |(previous, current, target)| {
                previous >= target && current < target
            }),
        AlertType::RisesAbove => level_inputs(alert, quotes)
            .map_or(false, |(previous, current, target)| {
                previous <= target && current > target
            }),
        AlertType::PriceTarget => level_inputs(alert, quotes)
            .map_or(false, |(previous, current, target)| {
                (previous < target && current >= target)
                    || (previous > target && current <= target)
            }),
    }
}

/// (previous close, current price, target) for a level alert, `None`
/// when the alert has no target or its ticker has no quote.
fn level_inputs(alert: &Alert, quotes: &HashMap<String, Quote>) -> Option<(Decimal, Decimal, Decimal)> {
    let target = alert.target_price?;
    let quote = alert.ticker.as_ref().and_then(|ticker| quotes.get(ticker))?;
    Some((quote.previous_close(), quote.price, target))
}
