//! Market data module - quotes, history, news and the provider seam.

pub(crate) mod market_data_cache;
pub(crate) mod market_data_constants;
pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_service;
pub(crate) mod market_data_traits;
pub(crate) mod providers;


pub use market_data_cache::TtlCache;
pub use market_data_constants::*;
pub use market_data_errors::MarketDataError;
pub use market_data_model::{
    Candle, DataSource, GetHistoryRequest, GetQuotesRequest, GetQuotesResponse, HistoricalData,
    HistoryInterval, HistoryRange, NewsItem, Quote, QuoteError, Sentiment, TickerProfile,
};
pub use market_data_service::MarketDataService;
pub use market_data_traits::MarketDataServiceTrait;

// Re-export provider types
pub use providers::{ManualProvider, MarketDataProviderTrait, YahooProvider};
