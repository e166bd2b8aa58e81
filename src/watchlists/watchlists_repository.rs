use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::watchlists_model::WatchlistEntry;
use super::watchlists_traits::WatchlistRepositoryTrait;
use crate::errors::Result;
use crate::watchlists::WatchlistError;

/// In-memory repository for watchlist entries, keyed by entry id.
#[derive(Default)]
pub struct WatchlistRepository {
    store: RwLock<HashMap<String, WatchlistEntry>>,
}

impl WatchlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    async fn create(&self, entry: WatchlistEntry) -> Result<WatchlistEntry> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if store.contains_key(&entry.id) {
            return Err(WatchlistError::InvalidData(format!(
                "Watchlist entry with id '{}' already exists",
                entry.id
            ))
            .into());
        }
        let duplicate = store
            .values()
            .any(|e| e.portfolio_id == entry.portfolio_id && e.ticker == entry.ticker);
        if duplicate {
            return Err(WatchlistError::DuplicateTicker(entry.ticker.clone()).into());
        }
        store.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: WatchlistEntry) -> Result<WatchlistEntry> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if !store.contains_key(&entry.id) {
            return Err(WatchlistError::NotFound(entry.id.clone()).into());
        }
        store.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn delete(&self, entry_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        match store.remove(entry_id) {
            Some(_) => Ok(1),
            None => Err(WatchlistError::NotFound(entry_id.to_string()).into()),
        }
    }

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let before = store.len();
        store.retain(|_, e| e.portfolio_id != portfolio_id);
        Ok(before - store.len())
    }

    fn get_by_id(&self, entry_id: &str) -> Result<WatchlistEntry> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .get(entry_id)
            .cloned()
            .ok_or_else(|| WatchlistError::NotFound(entry_id.to_string()).into())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<WatchlistEntry>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<WatchlistEntry> = store
            .values()
            .filter(|e| e.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(entries)
    }
}
