//! Money-weighted return via Newton-Raphson root finding.
//!
//! Solves `NPV(r) = Σ cf_i / (1+r)^(days_i/365) = 0` for the annualized
//! rate. Flows carry investor signs: contributions negative, proceeds
//! and the terminal value positive.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::transactions::CashFlow;
use crate::utils::time_utils::year_fraction;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: Decimal = dec!(0.000001);
const INITIAL_GUESS: Decimal = dec!(0.1);
const RATE_FLOOR: Decimal = dec!(-0.99);
const RATE_CEILING: Decimal = dec!(10);

/// Annualized internal rate of return of an irregular flow series.
/// `None` under 2 flows, on non-convergence, or when the iteration
/// pins against the rate floor instead of finding a root.
pub(crate) fn xirr(cash_flows: &[CashFlow]) -> Option<Decimal> {
    if cash_flows.len() < 2 {
        return None;
    }

    let mut flows = cash_flows.to_vec();
    flows.sort_by_key(|flow| flow.date);
    let start = flows[0].date;
    let exponents: Vec<Decimal> = flows
        .iter()
        .map(|flow| year_fraction(start, flow.date))
        .collect();

    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let growth = Decimal::ONE + rate;
        let mut npv = Decimal::ZERO;
        let mut npv_derivative = Decimal::ZERO;
        for (flow, exponent) in flows.iter().zip(&exponents) {
            // Extreme rates over long spans push the discount factor
            // outside Decimal's range; treat that as divergence
            let factor = growth.checked_powd(*exponent)?;
            if factor.is_zero() {
                return None;
            }
            npv = npv.checked_add(flow.amount.checked_div(factor)?)?;
            let slope = exponent
                .checked_mul(flow.amount)?
                .checked_div(factor.checked_mul(growth)?)?;
            npv_derivative = npv_derivative.checked_sub(slope)?;
        }

        if npv.abs() < TOLERANCE {
            if rate <= RATE_FLOOR {
                return None;
            }
            return Some(rate);
        }
        if npv_derivative.is_zero() {
            return None;
        }
        rate = (rate - npv.checked_div(npv_derivative)?).clamp(RATE_FLOOR, RATE_CEILING);
    }
    None
}

/// XIRR of a portfolio: the external flows flipped to investor signs,
/// closed out by the terminal value of the valuation series. `None`
/// without a valuation series or without any external flow.
pub(crate) fn money_weighted_return(
    value_series: &[(NaiveDate, Decimal)],
    cash_flows: &[CashFlow],
) -> Option<Decimal> {
    let (terminal_date, terminal_value) = value_series.last()?;
    if cash_flows.is_empty() {
        return None;
    }
    let mut flows: Vec<CashFlow> = cash_flows
        .iter()
        .map(|flow| CashFlow {
            date: flow.date,
            amount: -flow.amount,
        })
        .collect();
    flows.push(CashFlow {
        date: *terminal_date,
        amount: *terminal_value,
    });
    xirr(&flows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(date: NaiveDate, amount: Decimal) -> CashFlow {
        CashFlow { date, amount }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn doubling_over_365_days_yields_one_hundred_percent() {
        // -1000 now, +2000 in exactly 365 days: (1+r)^1 = 2
        let flows = vec![
            flow(date(2021, 1, 1), dec!(-1000)),
            flow(date(2022, 1, 1), dec!(2000)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - dec!(1)).abs() < dec!(0.0001));
    }

    #[test]
    fn breaking_even_yields_zero() {
        let flows = vec![
            flow(date(2021, 1, 1), dec!(-1000)),
            flow(date(2022, 1, 1), dec!(1000)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!(rate.abs() < dec!(0.0001));
    }

    #[test]
    fn halving_yields_minus_fifty_percent() {
        let flows = vec![
            flow(date(2021, 1, 1), dec!(-1000)),
            flow(date(2022, 1, 1), dec!(500)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - dec!(-0.5)).abs() < dec!(0.0001));
    }

    #[test]
    fn order_of_flows_does_not_matter() {
        let forward = vec![
            flow(date(2021, 1, 1), dec!(-1000)),
            flow(date(2021, 7, 1), dec!(-500)),
            flow(date(2022, 1, 1), dec!(1800)),
        ];
        let mut shuffled = forward.clone();
        shuffled.reverse();
        assert_eq!(xirr(&forward), xirr(&shuffled));
    }

    #[test]
    fn all_negative_flows_never_converge() {
        let flows = vec![
            flow(date(2021, 1, 1), dec!(-1000)),
            flow(date(2022, 1, 1), dec!(-500)),
        ];
        assert_eq!(xirr(&flows), None);
    }

    #[test]
    fn a_single_flow_is_not_enough() {
        assert_eq!(xirr(&[flow(date(2021, 1, 1), dec!(-1000))]), None);
    }

    #[test]
    fn portfolio_wrapper_flips_signs_and_appends_terminal_value() {
        // One 1000 deposit, portfolio worth 2000 a year later
        let series = vec![
            (date(2021, 1, 1), dec!(1000)),
            (date(2022, 1, 1), dec!(2000)),
        ];
        let deposits = vec![flow(date(2021, 1, 1), dec!(1000))];
        let rate = money_weighted_return(&series, &deposits).unwrap();
        assert!((rate - dec!(1)).abs() < dec!(0.0001));

        assert_eq!(money_weighted_return(&series, &[]), None);
        assert_eq!(money_weighted_return(&[], &deposits), None);
    }
}
