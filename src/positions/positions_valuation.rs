//! Pure revaluation arithmetic for positions.
//!
//! The service feeds quotes in; these functions maintain the market block
//! of each position. Nothing here touches a repository or a provider.

use rust_decimal::Decimal;

use super::positions_model::Position;
use crate::constants::PERCENT_PRECISION;
use crate::market_data::Quote;

/// Recomputes the market block of one position from a fresh quote.
///
/// The weight is cleared rather than recomputed: it depends on every
/// sibling position and is restored by [`compute_weights`].
pub(crate) fn apply_quote(position: &mut Position, quote: &Quote) {
    let current_value = position.quantity * quote.price;
    let unrealized_pnl = current_value - position.cost_basis;

    position.current_price = Some(quote.price);
    position.current_value = Some(current_value);
    position.unrealized_pnl = Some(unrealized_pnl);
    position.unrealized_pnl_percent = if position.cost_basis.is_zero() {
        None
    } else {
        Some((unrealized_pnl / position.cost_basis * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION))
    };
    position.daily_change = Some(position.quantity * quote.change);
    position.daily_change_percent = Some(quote.change_percent);
    position.weight = None;
    position.last_price_update = Some(quote.timestamp);
}

/// Clears every market-derived field.
///
/// Called when quantity or average cost change so the next read never
/// sees figures computed against the old economics.
pub(crate) fn clear_market_fields(position: &mut Position) {
    position.current_price = None;
    position.current_value = None;
    position.unrealized_pnl = None;
    position.unrealized_pnl_percent = None;
    position.daily_change = None;
    position.daily_change_percent = None;
    position.weight = None;
    position.volatility_30d = None;
    position.volatility_90d = None;
    position.beta = None;
    position.last_price_update = None;
}

/// Total portfolio value, defined only when every position is priced.
pub(crate) fn total_value(positions: &[Position]) -> Option<Decimal> {
    positions
        .iter()
        .map(|p| p.current_value)
        .sum::<Option<Decimal>>()
}

/// Sets each position's weight as a percentage of total portfolio value.
///
/// With any unpriced position the denominator would misstate every
/// weight, so all weights become None until the portfolio is fully
/// priced again. A zero total also leaves the weights undefined.
pub(crate) fn compute_weights(positions: &mut [Position]) {
    let total = total_value(positions).filter(|t| !t.is_zero());

    for position in positions.iter_mut() {
        position.weight = match (total, position.current_value) {
            (Some(total), Some(value)) => {
                Some((value / total * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION))
            }
            _ => None,
        };
    }
}
