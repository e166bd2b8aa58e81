use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;

use super::alerts_evaluator::should_fire;
use super::alerts_model::{Alert, AlertStage, CreateAlertRequest};
use super::alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
use crate::errors::Result;
use crate::market_data::Quote;
use crate::portfolios::PortfolioRepositoryTrait;

/// Service for managing alerts and evaluating their conditions
pub struct AlertService {
    repository: Arc<dyn AlertRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl AlertService {
    pub fn new(
        repository: Arc<dyn AlertRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
        }
    }
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    /// Creates a new armed alert in the given portfolio
    async fn create_alert(
        &self,
        portfolio_id: &str,
        request: CreateAlertRequest,
    ) -> Result<Alert> {
        request.validate()?;
        self.portfolio_repository.get_by_id(portfolio_id)?;

        let now = Utc::now();
        let alert = Alert {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            ticker: request.normalized_ticker(),
            alert_type: request.alert_type,
            target_price: request.target_price,
            target_change_percent: request.target_change_percent,
            active: true,
            triggered: false,
            triggered_at: None,
            notified: false,
            notification_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        debug!(
            "Arming {:?} alert on {} in portfolio {}",
            alert.alert_type,
            alert.ticker.as_deref().unwrap_or("portfolio"),
            portfolio_id
        );
        self.repository.create(alert).await
    }

    /// Deletes an alert by ID
    async fn delete_alert(&self, alert_id: &str) -> Result<usize> {
        self.repository.delete(alert_id).await
    }

    /// Retrieves a single alert by ID
    fn get_alert(&self, alert_id: &str) -> Result<Alert> {
        self.repository.get_by_id(alert_id)
    }

    /// Lists the portfolio's alerts in creation order
    fn list_alerts(&self, portfolio_id: &str) -> Result<Vec<Alert>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Evaluates every armed alert against the quote batch, firing the
    /// ones whose condition holds. Alerts past the armed stage are left
    /// untouched so a fired alert never fires twice.
    async fn evaluate_alerts(
        &self,
        portfolio_id: &str,
        quotes: &HashMap<String, Quote>,
        portfolio_change_percent: Option<Decimal>,
    ) -> Result<Vec<Alert>> {
        let alerts = self.repository.list_by_portfolio(portfolio_id)?;
        let armed = alerts.len();

        let mut fired = Vec::new();
        for mut alert in alerts {
            if alert.stage() != AlertStage::Active {
                continue;
            }
            if should_fire(&alert, quotes, portfolio_change_percent) {
                alert.trigger(Utc::now())?;
                let alert = self.repository.update(alert).await?;
                fired.push(alert);
            }
        }
        debug!(
            "Evaluated {} alerts in portfolio {}, {} fired",
            armed,
            portfolio_id,
            fired.len()
        );
        Ok(fired)
    }

    /// Records that a fired alert was delivered to the user
    async fn mark_notified(&self, alert_id: &str) -> Result<Alert> {
        let mut alert = self.repository.get_by_id(alert_id)?;
        alert.mark_notified(Utc::now())?;
        self.repository.update(alert).await
    }

    /// Re-arms an alert, clearing its fire and delivery state
    async fn reactivate_alert(&self, alert_id: &str) -> Result<Alert> {
        let mut alert = self.repository.get_by_id(alert_id)?;
        alert.reactivate(Utc::now());
        self.repository.update(alert).await
    }
}
