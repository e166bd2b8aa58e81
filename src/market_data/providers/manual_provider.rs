use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::market_data::market_data_constants::DATA_SOURCE_MANUAL;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    Candle, HistoryInterval, HistoryRange, NewsItem, Quote, TickerProfile,
};

use super::market_data_provider::MarketDataProviderTrait;

/// Provider backed by caller-supplied data. Serves offline setups and
/// tests; never touches the network.
#[derive(Default)]
pub struct ManualProvider {
    quotes: RwLock<HashMap<String, Quote>>,
    candles: RwLock<HashMap<String, Vec<Candle>>>,
    fx_rates: RwLock<HashMap<(String, String), Decimal>>,
}

impl ManualProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_quote(&self, quote: Quote) {
        let mut quotes = self.quotes.write().unwrap_or_else(|e| e.into_inner());
        quotes.insert(quote.ticker.clone(), quote);
    }

    pub fn set_candles(&self, ticker: &str, mut candles: Vec<Candle>) {
        candles.sort_by_key(|c| c.date);
        let mut store = self.candles.write().unwrap_or_else(|e| e.into_inner());
        store.insert(ticker.to_string(), candles);
    }

    pub fn set_fx_rate(&self, from: &str, to: &str, rate: Decimal) {
        let mut rates = self.fx_rates.write().unwrap_or_else(|e| e.into_inner());
        rates.insert((from.to_string(), to.to_string()), rate);
    }
}

#[async_trait]
impl MarketDataProviderTrait for ManualProvider {
    fn id(&self) -> &'static str {
        DATA_SOURCE_MANUAL
    }

    async fn get_latest_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let quotes = self.quotes.read().unwrap_or_else(|e| e.into_inner());
        quotes
            .get(ticker)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(format!("No quote for {}", ticker)))
    }

    async fn get_historical_quotes(
        &self,
        ticker: &str,
        range: HistoryRange,
        _interval: HistoryInterval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let store = self.candles.read().unwrap_or_else(|e| e.into_inner());
        let series = store
            .get(ticker)
            .ok_or_else(|| MarketDataError::NotFound(format!("No history for {}", ticker)))?;

        // Window anchored on the newest candle so static series stay usable.
        let anchor = series.last().map(|c| c.date).unwrap_or_else(Utc::now);
        let cutoff = anchor - Duration::days(range.approx_days());
        Ok(series.iter().filter(|c| c.date >= cutoff).cloned().collect())
    }

    async fn get_fx_rate(&self, from: &str, to: &str) -> Result<Decimal, MarketDataError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let rates = self.fx_rates.read().unwrap_or_else(|e| e.into_inner());
        if let Some(rate) = rates.get(&(from.to_string(), to.to_string())) {
            return Ok(*rate);
        }
        // Fall back to the inverse pair when only one direction is seeded.
        if let Some(rate) = rates.get(&(to.to_string(), from.to_string())) {
            if !rate.is_zero() {
                return Ok(Decimal::ONE / *rate);
            }
        }
        Err(MarketDataError::NotFound(format!(
            "No exchange rate for {}/{}",
            from, to
        )))
    }

    async fn get_news(&self, _ticker: &str) -> Result<Vec<NewsItem>, MarketDataError> {
        Ok(Vec::new())
    }

    async fn get_profile(&self, ticker: &str) -> Result<TickerProfile, MarketDataError> {
        Ok(TickerProfile {
            ticker: ticker.to_string(),
            name: Some(ticker.to_string()),
            ..Default::default()
        })
    }
}
