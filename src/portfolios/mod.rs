//! Portfolios module - domain models, repository, service and traits.

pub(crate) mod portfolios_constants;
pub(crate) mod portfolios_errors;
pub(crate) mod portfolios_model;
pub(crate) mod portfolios_repository;
pub(crate) mod portfolios_service;
pub(crate) mod portfolios_traits;


pub use portfolios_constants::*;
pub use portfolios_errors::PortfolioError;
pub use portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
pub use portfolios_repository::PortfolioRepository;
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
