use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::alerts_errors::AlertError;
use super::alerts_model::Alert;
use super::alerts_traits::AlertRepositoryTrait;
use crate::errors::Result;

/// In-memory alert store.
#[derive(Default)]
pub struct AlertRepository {
    store: RwLock<HashMap<String, Alert>>,
}

impl AlertRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    async fn create(&self, alert: Alert) -> Result<Alert> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if store.contains_key(&alert.id) {
            return Err(
                AlertError::InvalidData(format!("Alert '{}' already exists", alert.id)).into(),
            );
        }
        store.insert(alert.id.clone(), alert.clone());
        Ok(alert)
    }

    async fn update(&self, alert: Alert) -> Result<Alert> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if !store.contains_key(&alert.id) {
            return Err(AlertError::NotFound(alert.id).into());
        }
        store.insert(alert.id.clone(), alert.clone());
        Ok(alert)
    }

    async fn delete(&self, alert_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        match store.remove(alert_id) {
            Some(_) => Ok(1),
            None => Err(AlertError::NotFound(alert_id.to_string()).into()),
        }
    }

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let before = store.len();
        store.retain(|_, alert| alert.portfolio_id != portfolio_id);
        Ok(before - store.len())
    }

    fn get_by_id(&self, alert_id: &str) -> Result<Alert> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .get(alert_id)
            .cloned()
            .ok_or_else(|| AlertError::NotFound(alert_id.to_string()).into())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Alert>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut alerts: Vec<Alert> = store
            .values()
            .filter(|alert| alert.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(alerts)
    }
}
