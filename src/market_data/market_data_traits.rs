use async_trait::async_trait;

use crate::errors::Result;

use super::market_data_model::{
    GetHistoryRequest, GetQuotesRequest, GetQuotesResponse, HistoricalData, NewsItem, Quote,
    TickerProfile,
};

#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Latest quote for a single ticker, served from cache when fresh.
    async fn get_quote(&self, ticker: &str) -> Result<Quote>;

    /// Batch quote fetch. Individual ticker failures are reported in
    /// the response, never as an overall error.
    async fn get_quotes(&self, request: GetQuotesRequest) -> Result<GetQuotesResponse>;

    async fn get_history(&self, request: GetHistoryRequest) -> Result<HistoricalData>;

    async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>>;

    async fn get_profile(&self, ticker: &str) -> Result<TickerProfile>;
}
