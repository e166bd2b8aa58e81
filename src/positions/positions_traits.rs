//! Position repository and service traits.

use async_trait::async_trait;
use std::collections::HashMap;

use super::positions_model::{CreatePositionRequest, Position, UpdatePositionRequest};
use crate::errors::Result;
use crate::market_data::Quote;

/// Trait defining the contract for Position repository operations.
///
/// Uniqueness of (portfolio, ticker) is a storage concern and is enforced
/// here; business rules live in the service.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    /// Persists a new position. Fails when the id or the
    /// (portfolio, ticker) pair already exists.
    async fn create(&self, position: Position) -> Result<Position>;

    /// Replaces an existing position record.
    async fn update(&self, position: Position) -> Result<Position>;

    /// Replaces a batch of existing position records.
    async fn update_many(&self, positions: Vec<Position>) -> Result<()>;

    /// Deletes a position by its ID.
    async fn delete(&self, position_id: &str) -> Result<usize>;

    /// Deletes every position of a portfolio, returning how many went.
    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves a position by its ID.
    fn get_by_id(&self, position_id: &str) -> Result<Position>;

    /// Looks up a position by ticker within one portfolio.
    fn get_by_ticker(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Position>>;

    /// Lists the positions of a portfolio.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Position>>;
}

/// Trait defining the contract for Position service operations.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    /// Creates a position inside a portfolio with business validation.
    async fn create_position(
        &self,
        portfolio_id: &str,
        request: CreatePositionRequest,
    ) -> Result<Position>;

    /// Applies a partial update. Quantity or average-cost changes clear
    /// the market valuation block.
    async fn update_position(
        &self,
        position_id: &str,
        request: UpdatePositionRequest,
    ) -> Result<Position>;

    /// Deletes a position by its ID.
    async fn delete_position(&self, position_id: &str) -> Result<()>;

    /// Retrieves a position by ID.
    fn get_position(&self, position_id: &str) -> Result<Position>;

    /// Lists the positions of a portfolio.
    fn list_positions(&self, portfolio_id: &str) -> Result<Vec<Position>>;

    /// Recomputes one position's market block from a quote.
    async fn revalue_position(&self, position_id: &str, quote: &Quote) -> Result<Position>;

    /// Recomputes the market block of every position in a portfolio from
    /// a ticker-keyed quote map, then the portfolio weights. Positions
    /// whose ticker has no quote keep their previous figures.
    async fn revalue_portfolio(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
    ) -> Result<Vec<Position>>;
}
