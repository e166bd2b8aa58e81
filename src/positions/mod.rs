//! Positions module - domain models, valuation arithmetic, repository,
//! service and traits.

pub(crate) mod positions_errors;
pub(crate) mod positions_model;
pub(crate) mod positions_repository;
pub(crate) mod positions_service;
pub(crate) mod positions_traits;
pub(crate) mod positions_valuation;


pub use positions_errors::PositionError;
pub use positions_model::{
    validate_ticker, AssetType, CreatePositionRequest, Position, UpdatePositionRequest,
};
pub use positions_repository::PositionRepository;
pub use positions_service::PositionService;
pub use positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
