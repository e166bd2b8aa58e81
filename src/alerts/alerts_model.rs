//! Alert domain models and lifecycle.
//!
//! An alert moves through three stages: armed (`active`), fired
//! (`triggered`, with `triggered_at`) and delivered (`notified`, with
//! `notification_sent_at`). The booleans are cumulative history; the
//! current stage is always the furthest one reached, and `reactivate`
//! rewinds everything back to armed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::alerts_errors::AlertError;
use crate::errors::{Error, Result, ValidationError};
use crate::positions::validate_ticker;
use crate::utils::decimal_serde::decimal_serde_option;

/// Kind of alert condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    /// Price crosses the target in either direction
    PriceTarget,
    /// Absolute daily change percent reaches the threshold
    PercentChange,
    /// Price crosses the target downward
    DropsBelow,
    /// Price crosses the target upward
    RisesAbove,
}

impl AlertType {
    /// True for conditions expressed against a price level.
    pub fn needs_target_price(&self) -> bool {
        !matches!(self, AlertType::PercentChange)
    }
}

/// Current lifecycle stage of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStage {
    Active,
    Triggered,
    Notified,
    Inactive,
}

/// Domain model representing a price or movement alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub portfolio_id: String,
    /// Instrument the condition watches. A PERCENT_CHANGE alert without
    /// a ticker watches the whole portfolio's daily move.
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default, with = "decimal_serde_option")]
    pub target_price: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub target_change_percent: Option<Decimal>,
    pub active: bool,
    pub triggered: bool,
    pub triggered_at: Option<DateTime<Utc>>,
    pub notified: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// The stage the alert is currently in.
    pub fn stage(&self) -> AlertStage {
        if self.notified {
            AlertStage::Notified
        } else if self.triggered {
            AlertStage::Triggered
        } else if self.active {
            AlertStage::Active
        } else {
            AlertStage::Inactive
        }
    }

    /// Fires an armed alert.
    pub fn trigger(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.stage() != AlertStage::Active {
            return Err(AlertError::IllegalTransition(format!(
                "cannot trigger alert '{}' from stage {:?}",
                self.id,
                self.stage()
            ))
            .into());
        }
        self.active = false;
        self.triggered = true;
        self.triggered_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    /// Records that the fired alert was delivered.
    pub fn mark_notified(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.stage() != AlertStage::Triggered {
            return Err(AlertError::IllegalTransition(format!(
                "cannot mark alert '{}' notified from stage {:?}",
                self.id,
                self.stage()
            ))
            .into());
        }
        self.notified = true;
        self.notification_sent_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    /// Rewinds the alert to armed, clearing all fire/delivery state.
    pub fn reactivate(&mut self, at: DateTime<Utc>) {
        self.active = true;
        self.triggered = false;
        self.triggered_at = None;
        self.notified = false;
        self.notification_sent_at = None;
        self.updated_at = at;
    }
}

/// Input model for creating a new alert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default, with = "decimal_serde_option")]
    pub target_price: Option<Decimal>,
    #[serde(default, with = "decimal_serde_option")]
    pub target_change_percent: Option<Decimal>,
}

impl CreateAlertRequest {
    /// Ticker trimmed and uppercased, when one was provided.
    pub fn normalized_ticker(&self) -> Option<String> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    }

    /// Validates that the condition payload matches the alert type
    pub fn validate(&self) -> Result<()> {
        if let Some(ticker) = self.normalized_ticker() {
            validate_ticker(&ticker)?;
        }

        if self.alert_type.needs_target_price() {
            if self.normalized_ticker().is_none() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "ticker".to_string(),
                )));
            }
            match self.target_price {
                Some(price) if price > Decimal::ZERO => {}
                Some(price) => {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Target price must be positive, got {}",
                        price
                    ))))
                }
                None => {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "targetPrice".to_string(),
                    )))
                }
            }
        } else {
            match self.target_change_percent {
                Some(threshold) if threshold > Decimal::ZERO => {}
                Some(threshold) => {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Change threshold must be positive, got {}",
                        threshold
                    ))))
                }
                None => {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "targetChangePercent".to_string(),
                    )))
                }
            }
        }
        Ok(())
    }
}
