use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::metrics_calculator::calculate_metrics;
use super::performance_model::{MetricsInputs, PortfolioMetrics};
use super::statistics::{
    align_by_date, annualized_volatility, beta, closes_to_series, dated_returns,
    VOLATILITY_WINDOW_30D, VOLATILITY_WINDOW_90D,
};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::market_data::{
    GetHistoryRequest, HistoryInterval, HistoryRange, MarketDataServiceTrait,
};
use crate::portfolios::PortfolioRepositoryTrait;
use crate::positions::{Position, PositionRepositoryTrait};
use crate::transactions::TransactionServiceTrait;

/// History window backing the return-series statistics.
const METRICS_HISTORY_RANGE: HistoryRange = HistoryRange::OneYear;

/// Trait defining the contract for performance service implementations
#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Computes the full metrics block for one portfolio.
    async fn calculate_portfolio_metrics(&self, portfolio_id: &str) -> Result<PortfolioMetrics>;

    /// Computes per-position volatility windows and beta from each
    /// position's own price history and persists them.
    async fn enrich_position_risk(&self, portfolio_id: &str) -> Result<Vec<Position>>;
}

/// Service gathering calculator inputs and running the metrics block
pub struct PerformanceService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    transaction_service: Arc<dyn TransactionServiceTrait>,
    market_data_service: Arc<dyn MarketDataServiceTrait>,
}

impl PerformanceService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        transaction_service: Arc<dyn TransactionServiceTrait>,
        market_data_service: Arc<dyn MarketDataServiceTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            position_repository,
            transaction_service,
            market_data_service,
        }
    }

    /// Daily closes for a ticker over the metrics window. A fetch
    /// failure is reported as `None` so the ticker lands in
    /// `excluded_tickers` instead of failing the whole run.
    async fn fetch_daily_closes(&self, ticker: &str) -> Option<BTreeMap<NaiveDate, Decimal>> {
        let request = GetHistoryRequest {
            ticker: ticker.to_string(),
            range: METRICS_HISTORY_RANGE,
            interval: HistoryInterval::OneDay,
        };
        match self.market_data_service.get_history(request).await {
            Ok(history) => Some(history.daily_closes()),
            Err(e) => {
                warn!("No usable price history for {}: {}", ticker, e);
                None
            }
        }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    /// Gathers positions, price history, benchmark closes and external
    /// flows, then runs the pure calculator. Aggregates build on the
    /// stored market block, so revalue positions first for figures as
    /// of the latest quotes.
    async fn calculate_portfolio_metrics(&self, portfolio_id: &str) -> Result<PortfolioMetrics> {
        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        let positions = self.position_repository.list_by_portfolio(portfolio_id)?;
        let cash_flows = self.transaction_service.external_cash_flows(portfolio_id)?;

        let mut price_history = HashMap::new();
        for position in &positions {
            if price_history.contains_key(&position.ticker) {
                continue;
            }
            if let Some(closes) = self.fetch_daily_closes(&position.ticker).await {
                price_history.insert(position.ticker.clone(), closes);
            }
        }
        let benchmark_history = self
            .fetch_daily_closes(&portfolio.benchmark)
            .await
            .unwrap_or_default();

        let inputs = MetricsInputs {
            portfolio_id: portfolio_id.to_string(),
            positions,
            price_history,
            benchmark_history,
            risk_free_rate: portfolio.risk_free_rate,
            cash_flows,
        };
        let metrics = calculate_metrics(&inputs);
        debug!(
            "Metrics for portfolio {}: total value {}, {} tickers excluded",
            portfolio_id,
            metrics.total_value,
            metrics.excluded_tickers.len()
        );
        Ok(metrics)
    }

    async fn enrich_position_risk(&self, portfolio_id: &str) -> Result<Vec<Position>> {
        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        let mut positions = self.position_repository.list_by_portfolio(portfolio_id)?;

        let benchmark_returns = match self.fetch_daily_closes(&portfolio.benchmark).await {
            Some(closes) => dated_returns(&closes_to_series(&closes)),
            None => Vec::new(),
        };

        let mut enriched = 0usize;
        for position in &mut positions {
            let closes = match self.fetch_daily_closes(&position.ticker).await {
                Some(closes) if !closes.is_empty() => closes,
                _ => continue,
            };
            let returns = dated_returns(&closes_to_series(&closes));
            let return_values: Vec<Decimal> = returns.iter().map(|(_, r)| *r).collect();

            position.volatility_30d = annualized_volatility(&return_values, VOLATILITY_WINDOW_30D)
                .map(|v| v.round_dp(DECIMAL_PRECISION));
            position.volatility_90d = annualized_volatility(&return_values, VOLATILITY_WINDOW_90D)
                .map(|v| v.round_dp(DECIMAL_PRECISION));
            let (aligned_position, aligned_benchmark) =
                align_by_date(&returns, &benchmark_returns);
            position.beta = beta(&aligned_position, &aligned_benchmark)
                .map(|v| v.round_dp(DECIMAL_PRECISION));
            position.updated_at = Utc::now();
            enriched += 1;
        }
        debug!(
            "{}/{} positions risk-enriched in portfolio {}",
            enriched,
            positions.len(),
            portfolio_id
        );

        self.position_repository
            .update_many(positions.clone())
            .await?;
        Ok(positions)
    }
}
