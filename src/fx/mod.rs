pub(crate) mod fx_errors;
pub(crate) mod fx_model;
pub(crate) mod fx_service;
pub(crate) mod fx_traits;

pub use fx_errors::FxError;
pub use fx_model::{detect_currency, Currency};
pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
