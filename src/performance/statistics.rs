//! Return-series statistics over `Decimal` values.
//!
//! Estimators are standardized on the sample (n−1) form for standard
//! deviation and covariance, and on linear interpolation for
//! percentiles. Every function returns `None` instead of a fallback
//! value when the series is too short to estimate.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::transactions::CashFlow;

pub(crate) const VOLATILITY_WINDOW_30D: usize = 30;
pub(crate) const VOLATILITY_WINDOW_90D: usize = 90;

const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866); // sqrt(252)
const VAR_TAIL_PERCENTILE: Decimal = dec!(5);

fn annualization_factor() -> Decimal {
    Decimal::from(TRADING_DAYS_PER_YEAR)
        .sqrt()
        .unwrap_or(SQRT_TRADING_DAYS_APPROX)
}

/// Flattens a close map into a chronological series.
pub(crate) fn closes_to_series(closes: &BTreeMap<NaiveDate, Decimal>) -> Vec<(NaiveDate, Decimal)> {
    closes.iter().map(|(date, close)| (*date, *close)).collect()
}

/// Daily returns `p_t / p_{t−1} − 1` of a chronological series, tagged
/// with the later date of each pair. Pairs with a zero predecessor are
/// skipped.
pub(crate) fn dated_returns(series: &[(NaiveDate, Decimal)]) -> Vec<(NaiveDate, Decimal)> {
    series
        .windows(2)
        .filter(|window| !window[0].1.is_zero())
        .map(|window| (window[1].0, window[1].1 / window[0].1 - Decimal::ONE))
        .collect()
}

/// Sample standard deviation, `None` under 2 observations.
pub(crate) fn sample_std(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let count = Decimal::from(values.len());
    let mean = values.iter().sum::<Decimal>() / count;
    let sum_squared_diff: Decimal = values
        .iter()
        .map(|&value| {
            let diff = value - mean;
            diff * diff
        })
        .sum();
    (sum_squared_diff / (count - Decimal::ONE)).sqrt()
}

/// Annualized volatility over the trailing `window` observations.
pub(crate) fn annualized_volatility(returns: &[Decimal], window: usize) -> Option<Decimal> {
    let start = returns.len().saturating_sub(window);
    sample_std(&returns[start..]).map(|std| std * annualization_factor())
}

fn excess_returns(returns: &[Decimal], annual_risk_free_rate: Decimal) -> Vec<Decimal> {
    let daily_risk_free = annual_risk_free_rate / Decimal::from(TRADING_DAYS_PER_YEAR);
    returns.iter().map(|&r| r - daily_risk_free).collect()
}

/// Sharpe ratio: annualized mean excess return over annualized
/// volatility. `None` under 2 observations or at zero volatility.
pub(crate) fn sharpe_ratio(returns: &[Decimal], annual_risk_free_rate: Decimal) -> Option<Decimal> {
    let annualized_std = sample_std(returns)? * annualization_factor();
    if annualized_std.is_zero() {
        return None;
    }
    let excess = excess_returns(returns, annual_risk_free_rate);
    let mean_excess = excess.iter().sum::<Decimal>() / Decimal::from(excess.len());
    Some(mean_excess * Decimal::from(TRADING_DAYS_PER_YEAR) / annualized_std)
}

/// Sortino ratio: same numerator as Sharpe over the downside
/// deviation, where the downside deviation averages `min(excess, 0)²`
/// over all observations. `None` when no observation is below the
/// risk-free floor.
pub(crate) fn sortino_ratio(
    returns: &[Decimal],
    annual_risk_free_rate: Decimal,
) -> Option<Decimal> {
    if returns.len() < 2 {
        return None;
    }
    let excess = excess_returns(returns, annual_risk_free_rate);
    let count = Decimal::from(excess.len());
    let downside_sum: Decimal = excess
        .iter()
        .map(|&value| {
            let shortfall = value.min(Decimal::ZERO);
            shortfall * shortfall
        })
        .sum();
    let downside_deviation = (downside_sum / count).sqrt()? * annualization_factor();
    if downside_deviation.is_zero() {
        return None;
    }
    let mean_excess = excess.iter().sum::<Decimal>() / count;
    Some(mean_excess * Decimal::from(TRADING_DAYS_PER_YEAR) / downside_deviation)
}

/// Maximum peak-to-trough decline of a value series, as a positive
/// fraction. `None` under 2 values.
pub(crate) fn max_drawdown(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let mut peak = values[0];
    let mut worst = Decimal::ZERO;
    for &value in values {
        peak = peak.max(value);
        if !peak.is_zero() {
            worst = worst.max((peak - value) / peak);
        }
    }
    Some(worst)
}

/// Pairs two dated return series on their shared dates, in order.
pub(crate) fn align_by_date(
    left: &[(NaiveDate, Decimal)],
    right: &[(NaiveDate, Decimal)],
) -> (Vec<Decimal>, Vec<Decimal>) {
    let right_by_date: HashMap<NaiveDate, Decimal> = right.iter().copied().collect();
    let mut left_aligned = Vec::new();
    let mut right_aligned = Vec::new();
    for (date, value) in left {
        if let Some(other) = right_by_date.get(date) {
            left_aligned.push(*value);
            right_aligned.push(*other);
        }
    }
    (left_aligned, right_aligned)
}

/// Beta of a return series against a benchmark: sample covariance over
/// the benchmark's sample variance. The slices must already be aligned
/// pairwise. `None` under 2 points or at zero benchmark variance.
pub(crate) fn beta(
    portfolio_returns: &[Decimal],
    benchmark_returns: &[Decimal],
) -> Option<Decimal> {
    if portfolio_returns.len() != benchmark_returns.len() || portfolio_returns.len() < 2 {
        return None;
    }
    let count = Decimal::from(portfolio_returns.len());
    let portfolio_mean = portfolio_returns.iter().sum::<Decimal>() / count;
    let benchmark_mean = benchmark_returns.iter().sum::<Decimal>() / count;

    let covariance = portfolio_returns
        .iter()
        .zip(benchmark_returns)
        .map(|(&p, &b)| (p - portfolio_mean) * (b - benchmark_mean))
        .sum::<Decimal>()
        / (count - Decimal::ONE);
    let variance = benchmark_returns
        .iter()
        .map(|&b| {
            let diff = b - benchmark_mean;
            diff * diff
        })
        .sum::<Decimal>()
        / (count - Decimal::ONE);

    if variance.is_zero() {
        return None;
    }
    Some(covariance / variance)
}

/// Historical 95% value at risk: the 5th percentile of daily returns
/// scaled by the current portfolio value, as a positive loss amount.
pub(crate) fn value_at_risk(returns: &[Decimal], portfolio_value: Decimal) -> Option<Decimal> {
    let tail_return = percentile(returns, VAR_TAIL_PERCENTILE)?;
    Some((tail_return * portfolio_value).abs())
}

fn percentile(values: &[Decimal], pct: Decimal) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let rank = pct / dec!(100) * Decimal::from(sorted.len() - 1);
    let lower_index = rank.floor().to_usize()?;
    let fraction = rank - rank.floor();
    let lower = sorted[lower_index];
    if fraction.is_zero() || lower_index + 1 >= sorted.len() {
        return Some(lower);
    }
    Some(lower + fraction * (sorted[lower_index + 1] - lower))
}

/// Time-weighted return over a dated value series with external flows:
/// sub-period returns `(EMV − BMV − CF) / (BMV + CF/2)` chain-linked,
/// minus one. Flows map to the first observation date on or after
/// them; flows on or before the first observation are already part of
/// the starting value. `None` under 2 observations.
pub(crate) fn time_weighted_return(
    values: &[(NaiveDate, Decimal)],
    cash_flows: &[CashFlow],
) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let mut flow_by_index: HashMap<usize, Decimal> = HashMap::new();
    for flow in cash_flows {
        if flow.date <= values[0].0 {
            continue;
        }
        if let Some(index) = values.iter().position(|(date, _)| *date >= flow.date) {
            *flow_by_index.entry(index).or_insert(Decimal::ZERO) += flow.amount;
        }
    }

    let two = dec!(2);
    let mut chained = Decimal::ONE;
    let mut begin_value = values[0].1;
    for (index, &(_, end_value)) in values.iter().enumerate().skip(1) {
        let flow = flow_by_index.get(&index).copied().unwrap_or(Decimal::ZERO);
        let denominator = begin_value + flow / two;
        let period_return = if denominator.is_zero() {
            Decimal::ZERO
        } else {
            (end_value - begin_value - flow) / denominator
        };
        chained *= Decimal::ONE + period_return;
        begin_value = end_value;
    }
    Some(chained - Decimal::ONE)
}
