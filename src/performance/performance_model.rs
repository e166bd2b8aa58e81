use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::positions::Position;
use crate::transactions::CashFlow;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// Everything the metrics calculator consumes for one portfolio.
///
/// `price_history` maps tickers to daily closes; positions whose ticker
/// is missing from the map (or maps to an empty series) are excluded
/// from the return-series metrics and reported in `excluded_tickers`.
/// `cash_flows` are the portfolio's external flows, signed from the
/// portfolio's perspective.
#[derive(Debug, Clone)]
pub struct MetricsInputs {
    pub portfolio_id: String,
    pub positions: Vec<Position>,
    pub price_history: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
    pub benchmark_history: BTreeMap<NaiveDate, Decimal>,
    pub risk_free_rate: Decimal,
    pub cash_flows: Vec<CashFlow>,
}

/// Portfolio-level metrics block.
///
/// The money and percent aggregates are always present and fall back to
/// zero when undefined. The statistical metrics are `None` whenever the
/// underlying series is too short to estimate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub portfolio_id: String,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub daily_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub daily_pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl_percent: Decimal,
    #[serde(default, with = "decimal_serde_option")]
    pub volatility_30d: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub volatility_90d: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub max_drawdown: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub sharpe_ratio: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub sortino_ratio: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub beta: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub var_95: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub twr: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub irr: Option<Decimal>,
    /// Tickers left out of the return-series metrics for lack of
    /// price history. They still count in the money aggregates.
    #[serde(default)]
    pub excluded_tickers: Vec<String>,
    /// Bounds of the valuation series the statistics were computed on.
    pub period_start_date: Option<NaiveDate>,
    pub period_end_date: Option<NaiveDate>,
}
