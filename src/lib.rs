pub mod alerts;
pub mod constants;
pub mod context;
pub mod errors;
pub mod fx;
pub mod market_data;
pub mod performance;
pub mod portfolios;
pub mod positions;
pub mod transactions;
pub mod utils;
pub mod watchlists;

pub use context::ServiceContext;
pub use errors::{Error, Result};
