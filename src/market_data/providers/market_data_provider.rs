use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    Candle, HistoryInterval, HistoryRange, NewsItem, Quote, TickerProfile,
};

/// A market data source.
///
/// Implementations fetch raw quotes, candles and FX rates from one
/// upstream. Optional capabilities keep the default `NotSupported`
/// implementation when the upstream has no equivalent.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Stable identifier, used in logs and error messages.
    fn id(&self) -> &'static str;

    async fn get_latest_quote(&self, ticker: &str) -> Result<Quote, MarketDataError>;

    /// Candles ordered by timestamp ascending.
    async fn get_historical_quotes(
        &self,
        ticker: &str,
        range: HistoryRange,
        interval: HistoryInterval,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Conversion rate between two currency codes.
    async fn get_fx_rate(&self, from: &str, to: &str) -> Result<Decimal, MarketDataError>;

    async fn get_profile(&self, ticker: &str) -> Result<TickerProfile, MarketDataError> {
        let _ = ticker;
        Err(MarketDataError::NotSupported {
            operation: "profile".to_string(),
            provider: self.id().to_string(),
        })
    }

    async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>, MarketDataError> {
        let _ = ticker;
        Err(MarketDataError::NotSupported {
            operation: "news".to_string(),
            provider: self.id().to_string(),
        })
    }
}
