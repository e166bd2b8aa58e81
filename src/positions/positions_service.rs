use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::positions_model::{CreatePositionRequest, Position, UpdatePositionRequest};
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use super::positions_valuation::{apply_quote, clear_market_fields, compute_weights};
use crate::errors::Result;
use crate::market_data::Quote;
use crate::portfolios::PortfolioRepositoryTrait;

/// Service for managing positions
pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl PositionService {
    /// Creates a new PositionService instance
    pub fn new(
        repository: Arc<dyn PositionRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
        }
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[async_trait::async_trait]
impl PositionServiceTrait for PositionService {
    /// Creates a position inside a portfolio with business validation
    async fn create_position(
        &self,
        portfolio_id: &str,
        request: CreatePositionRequest,
    ) -> Result<Position> {
        request.validate()?;
        // Unknown portfolios fail before anything is written
        self.portfolio_repository.get_by_id(portfolio_id)?;

        let ticker = request.normalized_ticker();
        debug!("Creating position {} in portfolio {}", ticker, portfolio_id);

        let now = Utc::now();
        let position = Position {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            ticker,
            name: request.name,
            asset_type: request.asset_type,
            currency: request.currency,
            quantity: request.quantity,
            avg_cost: request.avg_cost,
            broker: request.broker,
            tags: normalize_tags(request.tags),
            notes: request.notes,
            cost_basis: request.quantity * request.avg_cost,
            current_price: None,
            current_value: None,
            unrealized_pnl: None,
            unrealized_pnl_percent: None,
            daily_change: None,
            daily_change_percent: None,
            weight: None,
            volatility_30d: None,
            volatility_90d: None,
            beta: None,
            last_price_update: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(position).await
    }

    /// Applies a partial update to a position
    async fn update_position(
        &self,
        position_id: &str,
        mut request: UpdatePositionRequest,
    ) -> Result<Position> {
        request.validate()?;
        let mut position = self.repository.get_by_id(position_id)?;

        if let Some(quantity) = request.quantity {
            position.quantity = quantity;
        }
        if let Some(avg_cost) = request.avg_cost {
            position.avg_cost = avg_cost;
        }
        if let Some(notes) = request.notes.take() {
            position.notes = Some(notes);
        }
        if let Some(tags) = request.tags.take() {
            position.tags = normalize_tags(tags);
        }

        if request.changes_economics() {
            position.cost_basis = position.quantity * position.avg_cost;
            clear_market_fields(&mut position);
        }
        position.updated_at = Utc::now();

        self.repository.update(position).await
    }

    /// Deletes a position by its ID
    async fn delete_position(&self, position_id: &str) -> Result<()> {
        self.repository.delete(position_id).await?;
        Ok(())
    }

    /// Retrieves a position by its ID
    fn get_position(&self, position_id: &str) -> Result<Position> {
        self.repository.get_by_id(position_id)
    }

    /// Lists the positions of a portfolio
    fn list_positions(&self, portfolio_id: &str) -> Result<Vec<Position>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Recomputes one position's market block from a quote
    async fn revalue_position(&self, position_id: &str, quote: &Quote) -> Result<Position> {
        let mut position = self.repository.get_by_id(position_id)?;
        apply_quote(&mut position, quote);
        position.updated_at = Utc::now();
        self.repository.update(position).await
    }

    /// Recomputes every position of a portfolio from a quote map, then
    /// the portfolio weights
    async fn revalue_portfolio(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
    ) -> Result<Vec<Position>> {
        let mut positions = self.repository.list_by_portfolio(portfolio_id)?;
        if positions.is_empty() {
            return Ok(positions);
        }

        let now = Utc::now();
        let mut repriced = 0usize;
        for position in positions.iter_mut() {
            if let Some(quote) = quotes.get(&position.ticker) {
                apply_quote(position, quote);
                position.updated_at = now;
                repriced += 1;
            }
        }
        compute_weights(&mut positions);

        debug!(
            "Revalued portfolio {}: {}/{} positions repriced",
            portfolio_id,
            repriced,
            positions.len()
        );

        self.repository.update_many(positions.clone()).await?;
        Ok(positions)
    }
}
