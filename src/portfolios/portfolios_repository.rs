use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use super::portfolios_traits::PortfolioRepositoryTrait;
use crate::errors::Result;
use crate::portfolios::PortfolioError;

/// In-memory repository for portfolios.
///
/// Keyed by portfolio id. A storage-backed implementation would replace
/// this behind the same trait.
#[derive(Default)]
pub struct PortfolioRepository {
    store: RwLock<HashMap<String, Portfolio>>,
}

impl PortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        let now = Utc::now();
        let portfolio = Portfolio {
            id: new_portfolio
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            user_id: new_portfolio.user_id.clone(),
            name: new_portfolio.name.trim().to_string(),
            base_currency: new_portfolio.base_currency,
            benchmark: new_portfolio.benchmark_or_default(),
            risk_free_rate: new_portfolio.risk_free_rate_or_default(),
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if store.contains_key(&portfolio.id) {
            return Err(PortfolioError::InvalidData(format!(
                "Portfolio with id '{}' already exists",
                portfolio.id
            ))
            .into());
        }
        store.insert(portfolio.id.clone(), portfolio.clone());
        Ok(portfolio)
    }

    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let portfolio = store
            .get_mut(&update.id)
            .ok_or_else(|| PortfolioError::NotFound(update.id.clone()))?;

        if let Some(name) = update.name {
            portfolio.name = name.trim().to_string();
        }
        if let Some(benchmark) = update.benchmark {
            portfolio.benchmark = benchmark.trim().to_uppercase();
        }
        if let Some(rate) = update.risk_free_rate {
            portfolio.risk_free_rate = rate;
        }
        portfolio.updated_at = Utc::now();
        Ok(portfolio.clone())
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        match store.remove(portfolio_id) {
            Some(_) => Ok(1),
            None => Err(PortfolioError::NotFound(portfolio_id.to_string()).into()),
        }
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .get(portfolio_id)
            .cloned()
            .ok_or_else(|| PortfolioError::NotFound(portfolio_id.to_string()).into())
    }

    fn list(&self, user_id_filter: Option<&str>) -> Result<Vec<Portfolio>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut portfolios: Vec<Portfolio> = store
            .values()
            .filter(|p| user_id_filter.map_or(true, |user_id| p.user_id == user_id))
            .cloned()
            .collect();
        portfolios.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(portfolios)
    }
}
