//! Composition root wiring repositories, the market data provider and services

use std::sync::Arc;

use crate::alerts::{AlertRepository, AlertService, AlertServiceTrait};
use crate::errors::Result;
use crate::fx::{FxService, FxServiceTrait};
use crate::market_data::{
    ManualProvider, MarketDataProviderTrait, MarketDataService, MarketDataServiceTrait,
    YahooProvider,
};
use crate::performance::{PerformanceService, PerformanceServiceTrait};
use crate::portfolios::{PortfolioRepository, PortfolioService, PortfolioServiceTrait};
use crate::positions::{PositionRepository, PositionService, PositionServiceTrait};
use crate::transactions::{
    SignConventions, TransactionRepository, TransactionService, TransactionServiceTrait,
};
use crate::watchlists::{WatchlistRepository, WatchlistService, WatchlistServiceTrait};

/// Fully wired service graph over in-memory repositories.
///
/// Embedders construct one context per running instance and reach every
/// service through it; tests swap the provider for a [`ManualProvider`].
pub struct ServiceContext {
    pub market_data_service: Arc<dyn MarketDataServiceTrait>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub position_service: Arc<dyn PositionServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub watchlist_service: Arc<dyn WatchlistServiceTrait>,
    pub alert_service: Arc<dyn AlertServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
}

impl ServiceContext {
    /// Wires the full service graph on top of the given provider.
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        Self::with_conventions(provider, SignConventions::default())
    }

    /// Same wiring with custom ledger sign conventions.
    pub fn with_conventions(
        provider: Arc<dyn MarketDataProviderTrait>,
        conventions: SignConventions,
    ) -> Self {
        let portfolio_repository = Arc::new(PortfolioRepository::new());
        let position_repository = Arc::new(PositionRepository::new());
        let transaction_repository = Arc::new(TransactionRepository::new());
        let watchlist_repository = Arc::new(WatchlistRepository::new());
        let alert_repository = Arc::new(AlertRepository::new());

        let market_data_service = Arc::new(MarketDataService::new(provider.clone()));
        let fx_service = Arc::new(FxService::new(provider));

        let portfolio_service = Arc::new(PortfolioService::new(
            portfolio_repository.clone(),
            position_repository.clone(),
            transaction_repository.clone(),
            watchlist_repository.clone(),
            alert_repository.clone(),
        ));
        let position_service = Arc::new(PositionService::new(
            position_repository.clone(),
            portfolio_repository.clone(),
        ));
        let transaction_service = Arc::new(TransactionService::new(
            transaction_repository,
            portfolio_repository.clone(),
            position_repository.clone(),
            conventions,
        ));
        let watchlist_service = Arc::new(WatchlistService::new(
            watchlist_repository,
            portfolio_repository.clone(),
        ));
        let alert_service = Arc::new(AlertService::new(
            alert_repository,
            portfolio_repository.clone(),
        ));
        let performance_service = Arc::new(PerformanceService::new(
            portfolio_repository,
            position_repository,
            transaction_service.clone(),
            market_data_service.clone(),
        ));

        ServiceContext {
            market_data_service,
            fx_service,
            portfolio_service,
            position_service,
            transaction_service,
            watchlist_service,
            alert_service,
            performance_service,
        }
    }

    /// Context backed by the live Yahoo Finance provider.
    pub fn new_yahoo() -> Result<Self> {
        Ok(Self::new(Arc::new(YahooProvider::new()?)))
    }

    /// Context backed by the in-memory manual provider, for tests and
    /// offline embedding.
    pub fn new_manual() -> Self {
        Self::new(Arc::new(ManualProvider::new()))
    }

    pub fn market_data_service(&self) -> Arc<dyn MarketDataServiceTrait> {
        Arc::clone(&self.market_data_service)
    }

    pub fn fx_service(&self) -> Arc<dyn FxServiceTrait> {
        Arc::clone(&self.fx_service)
    }

    pub fn portfolio_service(&self) -> Arc<dyn PortfolioServiceTrait> {
        Arc::clone(&self.portfolio_service)
    }

    pub fn position_service(&self) -> Arc<dyn PositionServiceTrait> {
        Arc::clone(&self.position_service)
    }

    pub fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait> {
        Arc::clone(&self.transaction_service)
    }

    pub fn watchlist_service(&self) -> Arc<dyn WatchlistServiceTrait> {
        Arc::clone(&self.watchlist_service)
    }

    pub fn alert_service(&self) -> Arc<dyn AlertServiceTrait> {
        Arc::clone(&self.alert_service)
    }

    pub fn performance_service(&self) -> Arc<dyn PerformanceServiceTrait> {
        Arc::clone(&self.performance_service)
    }
}
