use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::market_data::{MarketDataProviderTrait, TtlCache, FX_CACHE_TTL};

use super::fx_errors::FxError;
use super::fx_traits::FxServiceTrait;

/// Provider-backed currency conversion with a one hour rate cache.
pub struct FxService {
    provider: Arc<dyn MarketDataProviderTrait>,
    rate_cache: TtlCache<(String, String), Decimal>,
}

impl FxService {
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        FxService {
            provider,
            rate_cache: TtlCache::new(),
        }
    }

    fn normalize_code(code: &str) -> std::result::Result<String, FxError> {
        let normalized = code.trim().to_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(normalized)
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        let from = Self::normalize_code(from)?;
        let to = Self::normalize_code(to)?;
        if from == to {
            return Ok(Decimal::ONE);
        }

        let key = (from.clone(), to.clone());
        if let Some(rate) = self.rate_cache.get(&key) {
            debug!("FX cache hit: {}/{}", from, to);
            return Ok(rate);
        }

        let rate = self
            .provider
            .get_fx_rate(&from, &to)
            .await
            .map_err(|e| match e {
                crate::market_data::MarketDataError::NotFound(msg) => FxError::RateNotFound(msg),
                other => FxError::FetchError(format!("{}/{}: {}", from, to, other)),
            })?;
        if rate <= Decimal::ZERO {
            return Err(
                FxError::ConversionError(format!("Non-positive rate for {}/{}", from, to)).into(),
            );
        }

        self.rate_cache.insert(key, rate, FX_CACHE_TTL);
        Ok(rate)
    }

    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal> {
        let rate = self.get_rate(from, to).await?;
        Ok(amount * rate)
    }
}
