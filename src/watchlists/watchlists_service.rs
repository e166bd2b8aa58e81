use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::watchlists_model::{AddWatchlistEntryRequest, WatchlistEntry};
use super::watchlists_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
use crate::errors::Result;
use crate::market_data::Quote;
use crate::portfolios::PortfolioRepositoryTrait;

/// Service for managing per-portfolio watchlists
pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl WatchlistService {
    /// Creates a new WatchlistService instance
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
        }
    }
}

#[async_trait::async_trait]
impl WatchlistServiceTrait for WatchlistService {
    /// Adds a ticker to a portfolio's watchlist
    async fn add_entry(
        &self,
        portfolio_id: &str,
        request: AddWatchlistEntryRequest,
    ) -> Result<WatchlistEntry> {
        request.validate()?;
        self.portfolio_repository.get_by_id(portfolio_id)?;

        let ticker = request.normalized_ticker();
        debug!("Watching {} in portfolio {}", ticker, portfolio_id);

        let entry = WatchlistEntry {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            ticker,
            name: request.name,
            notes: request.notes,
            added_at: Utc::now(),
            current_price: None,
            daily_change: None,
            daily_change_percent: None,
            last_price_update: None,
        };

        self.repository.create(entry).await
    }

    /// Removes an entry by its ID
    async fn remove_entry(&self, entry_id: &str) -> Result<()> {
        self.repository.delete(entry_id).await?;
        Ok(())
    }

    /// Lists a portfolio's entries
    fn list_entries(&self, portfolio_id: &str) -> Result<Vec<WatchlistEntry>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Refreshes the quote snapshots from a ticker-keyed quote map
    async fn refresh_snapshots(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
    ) -> Result<Vec<WatchlistEntry>> {
        let mut entries = self.repository.list_by_portfolio(portfolio_id)?;

        let mut refreshed = 0usize;
        for entry in entries.iter_mut() {
            if let Some(quote) = quotes.get(&entry.ticker) {
                entry.apply_quote(quote);
                self.repository.update(entry.clone()).await?;
                refreshed += 1;
            }
        }
        debug!(
            "Refreshed watchlist for portfolio {}: {}/{} snapshots updated",
            portfolio_id,
            refreshed,
            entries.len()
        );
        Ok(entries)
    }
}
