//! Pure portfolio metrics calculation.
//!
//! `calculate_metrics` is a synchronous function of its inputs and
//! mutates nothing: the service layer gathers positions, history and
//! flows, this module turns them into a `PortfolioMetrics` block.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::performance_model::{MetricsInputs, PortfolioMetrics};
use super::statistics::{
    align_by_date, annualized_volatility, beta, closes_to_series, dated_returns, max_drawdown,
    sharpe_ratio, sortino_ratio, time_weighted_return, value_at_risk, VOLATILITY_WINDOW_30D,
    VOLATILITY_WINDOW_90D,
};
use super::xirr::money_weighted_return;
use crate::constants::{DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION, PERCENT_PRECISION};

pub fn calculate_metrics(inputs: &MetricsInputs) -> PortfolioMetrics {
    let positions = &inputs.positions;

    // Money aggregates cover every position, priced or not
    let total_value: Decimal = positions
        .iter()
        .map(|p| p.current_value.unwrap_or(Decimal::ZERO))
        .sum();
    let total_cost: Decimal = positions.iter().map(|p| p.cost_basis).sum();
    let total_pnl = total_value - total_cost;
    let total_pnl_percent = if total_cost > Decimal::ZERO {
        (total_pnl / total_cost * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION)
    } else {
        Decimal::ZERO
    };
    let daily_pnl: Decimal = positions
        .iter()
        .map(|p| p.daily_change.unwrap_or(Decimal::ZERO))
        .sum();
    let daily_pnl_percent = if total_value > Decimal::ZERO {
        (daily_pnl / total_value * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION)
    } else {
        Decimal::ZERO
    };

    // Positions without usable history drop out of the series metrics
    // but stay in the aggregates above
    let mut excluded_tickers = Vec::new();
    let mut covered: Vec<(Decimal, &std::collections::BTreeMap<NaiveDate, Decimal>)> = Vec::new();
    for position in positions {
        match inputs.price_history.get(&position.ticker) {
            Some(closes) if !closes.is_empty() => covered.push((position.quantity, closes)),
            _ => excluded_tickers.push(position.ticker.clone()),
        }
    }

    let value_series = portfolio_value_series(&covered);
    let values: Vec<Decimal> = value_series.iter().map(|(_, value)| *value).collect();
    let portfolio_returns = dated_returns(&value_series);
    let return_values: Vec<Decimal> = portfolio_returns.iter().map(|(_, r)| *r).collect();

    let benchmark_returns = dated_returns(&closes_to_series(&inputs.benchmark_history));
    let (aligned_portfolio, aligned_benchmark) =
        align_by_date(&portfolio_returns, &benchmark_returns);

    let round6 = |value: Decimal| value.round_dp(DECIMAL_PRECISION);

    PortfolioMetrics {
        portfolio_id: inputs.portfolio_id.clone(),
        total_value: total_value.round_dp(DISPLAY_DECIMAL_PRECISION),
        daily_pnl: daily_pnl.round_dp(DISPLAY_DECIMAL_PRECISION),
        daily_pnl_percent,
        total_pnl: total_pnl.round_dp(DISPLAY_DECIMAL_PRECISION),
        total_pnl_percent,
        volatility_30d: annualized_volatility(&return_values, VOLATILITY_WINDOW_30D).map(round6),
        volatility_90d: annualized_volatility(&return_values, VOLATILITY_WINDOW_90D).map(round6),
        max_drawdown: max_drawdown(&values).map(round6),
        sharpe_ratio: sharpe_ratio(&return_values, inputs.risk_free_rate).map(round6),
        sortino_ratio: sortino_ratio(&return_values, inputs.risk_free_rate).map(round6),
        beta: beta(&aligned_portfolio, &aligned_benchmark).map(round6),
        var_95: value_at_risk(&return_values, total_value)
            .map(|value| value.round_dp(DISPLAY_DECIMAL_PRECISION)),
        twr: time_weighted_return(&value_series, &inputs.cash_flows).map(round6),
        irr: money_weighted_return(&value_series, &inputs.cash_flows).map(round6),
        excluded_tickers,
        period_start_date: value_series.first().map(|(date, _)| *date),
        period_end_date: value_series.last().map(|(date, _)| *date),
    }
}

/// Sums quantity × close per date over the intersection of the covered
/// positions' dates, chronologically.
fn portfolio_value_series(
    covered: &[(Decimal, &std::collections::BTreeMap<NaiveDate, Decimal>)],
) -> Vec<(NaiveDate, Decimal)> {
    if covered.is_empty() {
        return Vec::new();
    }
    covered[0]
        .1
        .keys()
        .filter(|date| covered.iter().all(|(_, closes)| closes.contains_key(*date)))
        .map(|date| {
            let value = covered
                .iter()
                .map(|(quantity, closes)| *quantity * closes[date])
                .sum();
            (*date, value)
        })
        .collect()
}
