use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::alerts_model::{Alert, CreateAlertRequest};
use crate::errors::Result;
use crate::market_data::Quote;

/// Trait defining the contract for alert repository implementations
#[async_trait]
pub trait AlertRepositoryTrait: Send + Sync {
    async fn create(&self, alert: Alert) -> Result<Alert>;
    async fn update(&self, alert: Alert) -> Result<Alert>;
    async fn delete(&self, alert_id: &str) -> Result<usize>;
    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;
    fn get_by_id(&self, alert_id: &str) -> Result<Alert>;
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Alert>>;
}

/// Trait defining the contract for alert service implementations
#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    async fn create_alert(&self, portfolio_id: &str, request: CreateAlertRequest)
        -> Result<Alert>;
    async fn delete_alert(&self, alert_id: &str) -> Result<usize>;
    fn get_alert(&self, alert_id: &str) -> Result<Alert>;
    fn list_alerts(&self, portfolio_id: &str) -> Result<Vec<Alert>>;
    /// Fires every armed alert whose condition holds and returns the
    /// alerts that fired.
    async fn evaluate_alerts(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
        portfolio_change_percent: Option<Decimal>,
    ) -> Result<Vec<Alert>>;
    async fn mark_notified(&self, alert_id: &str) -> Result<Alert>;
    async fn reactivate_alert(&self, alert_id: &str) -> Result<Alert>;
}
