//! Watchlist repository and service traits.

use async_trait::async_trait;
use std::collections::HashMap;

use super::watchlists_model::{AddWatchlistEntryRequest, WatchlistEntry};
use crate::errors::Result;
use crate::market_data::Quote;

/// Trait defining the contract for Watchlist repository operations.
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    /// Persists a new entry. Fails when the ticker is already watched in
    /// the same portfolio.
    async fn create(&self, entry: WatchlistEntry) -> Result<WatchlistEntry>;

    /// Replaces an existing entry record.
    async fn update(&self, entry: WatchlistEntry) -> Result<WatchlistEntry>;

    /// Deletes an entry by its ID.
    async fn delete(&self, entry_id: &str) -> Result<usize>;

    /// Deletes every entry of a portfolio, returning how many went.
    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves an entry by its ID.
    fn get_by_id(&self, entry_id: &str) -> Result<WatchlistEntry>;

    /// Lists a portfolio's entries, sorted by ticker.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<WatchlistEntry>>;
}

/// Trait defining the contract for Watchlist service operations.
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    /// Adds a ticker to a portfolio's watchlist with business validation.
    async fn add_entry(
        &self,
        portfolio_id: &str,
        request: AddWatchlistEntryRequest,
    ) -> Result<WatchlistEntry>;

    /// Removes an entry by its ID.
    async fn remove_entry(&self, entry_id: &str) -> Result<()>;

    /// Lists a portfolio's entries.
    fn list_entries(&self, portfolio_id: &str) -> Result<Vec<WatchlistEntry>>;

    /// Refreshes the quote snapshots from a ticker-keyed quote map.
    /// Entries whose ticker is absent keep their previous snapshot.
    async fn refresh_snapshots(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
    ) -> Result<Vec<WatchlistEntry>>;
}
