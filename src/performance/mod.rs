//! Performance module - portfolio metrics, return series and risk statistics

pub(crate) mod metrics_calculator;
pub(crate) mod performance_model;
pub(crate) mod performance_service;
pub(crate) mod statistics;
pub(crate) mod xirr;

#[cfg(test)]
mod performance_service_tests;

pub use metrics_calculator::calculate_metrics;
pub use performance_model::{MetricsInputs, PortfolioMetrics};
pub use performance_service::{PerformanceService, PerformanceServiceTrait};
