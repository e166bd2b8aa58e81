//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! storage-specific types, allowing for different backing implementations.

use async_trait::async_trait;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use crate::errors::Result;

/// Trait defining the contract for Portfolio repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Creates a new portfolio, assigning an id when the input has none.
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Updates an existing portfolio.
    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Deletes a portfolio by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves a portfolio by its ID.
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Lists portfolios, optionally restricted to one user.
    fn list(&self, user_id_filter: Option<&str>) -> Result<Vec<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
///
/// The service layer handles business validation and coordinates the
/// delete cascade across the repositories of owned entities.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Creates a new portfolio with business validation.
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Updates an existing portfolio with business validation.
    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Deletes a portfolio and everything it owns.
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;

    /// Retrieves a portfolio by ID.
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Lists portfolios, optionally restricted to one user.
    fn list_portfolios(&self, user_id_filter: Option<&str>) -> Result<Vec<Portfolio>>;

    /// Lists the portfolios of a single user.
    fn get_portfolios_for_user(&self, user_id: &str) -> Result<Vec<Portfolio>>;
}
