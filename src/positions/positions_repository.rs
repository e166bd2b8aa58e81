use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::positions_model::Position;
use super::positions_traits::PositionRepositoryTrait;
use crate::errors::Result;
use crate::positions::PositionError;

/// In-memory repository for positions, keyed by position id.
#[derive(Default)]
pub struct PositionRepository {
    store: RwLock<HashMap<String, Position>>,
}

impl PositionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionRepositoryTrait for PositionRepository {
    async fn create(&self, position: Position) -> Result<Position> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if store.contains_key(&position.id) {
            return Err(PositionError::InvalidData(format!(
                "Position with id '{}' already exists",
                position.id
            ))
            .into());
        }
        let duplicate = store
            .values()
            .any(|p| p.portfolio_id == position.portfolio_id && p.ticker == position.ticker);
        if duplicate {
            return Err(PositionError::DuplicateTicker(position.ticker.clone()).into());
        }
        store.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn update(&self, position: Position) -> Result<Position> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if !store.contains_key(&position.id) {
            return Err(PositionError::NotFound(position.id.clone()).into());
        }
        store.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn update_many(&self, positions: Vec<Position>) -> Result<()> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        for position in &positions {
            if !store.contains_key(&position.id) {
                return Err(PositionError::NotFound(position.id.clone()).into());
            }
        }
        for position in positions {
            store.insert(position.id.clone(), position);
        }
        Ok(())
    }

    async fn delete(&self, position_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        match store.remove(position_id) {
            Some(_) => Ok(1),
            None => Err(PositionError::NotFound(position_id.to_string()).into()),
        }
    }

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let before = store.len();
        store.retain(|_, p| p.portfolio_id != portfolio_id);
        Ok(before - store.len())
    }

    fn get_by_id(&self, position_id: &str) -> Result<Position> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .get(position_id)
            .cloned()
            .ok_or_else(|| PositionError::NotFound(position_id.to_string()).into())
    }

    fn get_by_ticker(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Position>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        Ok(store
            .values()
            .find(|p| p.portfolio_id == portfolio_id && p.ticker == ticker)
            .cloned())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Position>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut positions: Vec<Position> = store
            .values()
            .filter(|p| p.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        positions.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(positions)
    }
}
