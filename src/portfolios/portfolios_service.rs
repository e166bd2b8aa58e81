use log::debug;
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::alerts::AlertRepositoryTrait;
use crate::errors::Result;
use crate::positions::PositionRepositoryTrait;
use crate::transactions::TransactionRepositoryTrait;
use crate::watchlists::WatchlistRepositoryTrait;

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    watchlist_repository: Arc<dyn WatchlistRepositoryTrait>,
    alert_repository: Arc<dyn AlertRepositoryTrait>,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        watchlist_repository: Arc<dyn WatchlistRepositoryTrait>,
        alert_repository: Arc<dyn AlertRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            position_repository,
            transaction_repository,
            watchlist_repository,
            alert_repository,
        }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    /// Creates a new portfolio with business validation
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        debug!(
            "Creating portfolio '{}' for user {}, base_currency: {}",
            new_portfolio.name, new_portfolio.user_id, new_portfolio.base_currency
        );
        self.repository.create(new_portfolio).await
    }

    /// Updates an existing portfolio with business validation
    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        update.validate()?;
        self.repository.update(update).await
    }

    /// Deletes a portfolio together with its positions, transactions,
    /// watchlist entries and alerts
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        // Resolve first so an unknown id fails before any cascade work
        let portfolio = self.repository.get_by_id(portfolio_id)?;

        let positions = self
            .position_repository
            .delete_by_portfolio(portfolio_id)
            .await?;
        let transactions = self
            .transaction_repository
            .delete_by_portfolio(portfolio_id)
            .await?;
        let watchlist_entries = self
            .watchlist_repository
            .delete_by_portfolio(portfolio_id)
            .await?;
        let alerts = self
            .alert_repository
            .delete_by_portfolio(portfolio_id)
            .await?;

        self.repository.delete(portfolio_id).await?;

        debug!(
            "Deleted portfolio '{}' ({} positions, {} transactions, {} watchlist entries, {} alerts)",
            portfolio.name, positions, transactions, watchlist_entries, alerts
        );
        Ok(())
    }

    /// Retrieves a portfolio by its ID
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)
    }

    /// Lists portfolios, optionally restricted to one user
    fn list_portfolios(&self, user_id_filter: Option<&str>) -> Result<Vec<Portfolio>> {
        self.repository.list(user_id_filter)
    }

    /// Lists the portfolios of a single user
    fn get_portfolios_for_user(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        self.list_portfolios(Some(user_id))
    }
}
