use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;

use crate::errors::{Result, ValidationError};

use super::market_data_cache::TtlCache;
use super::market_data_constants::{PROVIDER_BATCH_SIZE, QUOTE_CACHE_TTL};
use super::market_data_errors::MarketDataError;
use super::market_data_model::{
    GetHistoryRequest, GetQuotesRequest, GetQuotesResponse, HistoricalData, HistoryInterval,
    HistoryRange, NewsItem, Quote, QuoteError, TickerProfile,
};
use super::market_data_traits::MarketDataServiceTrait;
use super::providers::MarketDataProviderTrait;

/// Serves quotes and history from a provider, with a TTL cache in
/// front so bursts of identical requests hit upstream once.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProviderTrait>,
    quote_cache: TtlCache<String, Quote>,
    history_cache: TtlCache<(String, HistoryRange, HistoryInterval), HistoricalData>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        MarketDataService {
            provider,
            quote_cache: TtlCache::new(),
            history_cache: TtlCache::new(),
        }
    }

    fn normalize_ticker(ticker: &str) -> String {
        ticker.trim().to_uppercase()
    }

    fn require_ticker(ticker: &str) -> Result<String> {
        let normalized = Self::normalize_ticker(ticker);
        if normalized.is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        Ok(normalized)
    }

    async fn fetch_quote(&self, ticker: &str) -> std::result::Result<Quote, MarketDataError> {
        if let Some(quote) = self.quote_cache.get(&ticker.to_string()) {
            return Ok(quote);
        }
        let quote = self.provider.get_latest_quote(ticker).await?;
        self.quote_cache
            .insert(ticker.to_string(), quote.clone(), QUOTE_CACHE_TTL);
        Ok(quote)
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn get_quote(&self, ticker: &str) -> Result<Quote> {
        let ticker = Self::require_ticker(ticker)?;
        Ok(self.fetch_quote(&ticker).await?)
    }

    async fn get_quotes(&self, request: GetQuotesRequest) -> Result<GetQuotesResponse> {
        let mut seen = HashSet::new();
        let tickers: Vec<String> = request
            .tickers
            .iter()
            .map(|t| Self::normalize_ticker(t))
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();

        let mut quotes = Vec::with_capacity(tickers.len());
        let mut errors = Vec::new();

        for batch in tickers.chunks(PROVIDER_BATCH_SIZE) {
            let fetches = batch.iter().map(|ticker| self.fetch_quote(ticker));
            for (ticker, result) in batch.iter().zip(join_all(fetches).await) {
                match result {
                    Ok(quote) => quotes.push(quote),
                    Err(err) => {
                        warn!("Failed to fetch quote for {}: {}", ticker, err);
                        errors.push(QuoteError {
                            ticker: ticker.clone(),
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        Ok(GetQuotesResponse { quotes, errors })
    }

    async fn get_history(&self, request: GetHistoryRequest) -> Result<HistoricalData> {
        let ticker = Self::require_ticker(&request.ticker)?;
        let key = (ticker.clone(), request.range, request.interval);

        if let Some(data) = self.history_cache.get(&key) {
            return Ok(data);
        }

        let candles = self
            .provider
            .get_historical_quotes(&ticker, request.range, request.interval)
            .await?;
        let data = HistoricalData { ticker, candles };
        self.history_cache
            .insert(key, data.clone(), request.range.cache_ttl());

        Ok(data)
    }

    async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let ticker = Self::require_ticker(ticker)?;
        Ok(self.provider.get_news(&ticker).await?)
    }

    async fn get_profile(&self, ticker: &str) -> Result<TickerProfile> {
        let ticker = Self::require_ticker(ticker)?;
        Ok(self.provider.get_profile(&ticker).await?)
    }
}
