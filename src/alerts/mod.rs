//! Alerts module - price and movement alerts with a fire/notify lifecycle

pub(crate) mod alerts_errors;
pub(crate) mod alerts_evaluator;
pub(crate) mod alerts_model;
pub(crate) mod alerts_repository;
pub(crate) mod alerts_service;
pub(crate) mod alerts_traits;


pub use alerts_errors::AlertError;
pub use alerts_model::{Alert, AlertStage, AlertType, CreateAlertRequest};
pub use alerts_repository::AlertRepository;
pub use alerts_service::AlertService;
pub use alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
