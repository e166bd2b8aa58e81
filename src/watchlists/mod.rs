//! Watchlists module - per-portfolio watched tickers with quote snapshots.

pub(crate) mod watchlists_errors;
pub(crate) mod watchlists_model;
pub(crate) mod watchlists_repository;
pub(crate) mod watchlists_service;
pub(crate) mod watchlists_traits;

#[cfg(test)]
mod watchlists_service_tests;

pub use watchlists_errors::WatchlistError;
pub use watchlists_model::{AddWatchlistEntryRequest, WatchlistEntry};
pub use watchlists_repository::WatchlistRepository;
pub use watchlists_service::WatchlistService;
pub use watchlists_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
