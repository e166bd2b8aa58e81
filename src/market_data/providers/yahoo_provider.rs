use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use yahoo_finance_api as yahoo;

use crate::fx::detect_currency;
use crate::market_data::market_data_constants::DATA_SOURCE_YAHOO;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    Candle, HistoryInterval, HistoryRange, NewsItem, Quote, TickerProfile,
};

use super::market_data_provider::MarketDataProviderTrait;

const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";

pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new()?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(YahooProvider { connector, client })
    }

    fn decimal_from(value: f64) -> Decimal {
        Decimal::from_f64_retain(value).unwrap_or_default()
    }

    fn timestamp_to_utc(timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0)
            .single()
            .unwrap_or_default()
    }

    fn build_quote(
        ticker: &str,
        price: Decimal,
        previous_close: Option<Decimal>,
        currency: String,
        timestamp: DateTime<Utc>,
    ) -> Quote {
        let change = previous_close.map(|prev| price - prev).unwrap_or_default();
        let change_percent = match previous_close {
            Some(prev) if !prev.is_zero() => change / prev * dec!(100),
            _ => Decimal::ZERO,
        };
        Quote {
            ticker: ticker.to_string(),
            price,
            change,
            change_percent,
            currency,
            timestamp,
        }
    }

    /// Primary path: last two daily bars give the price and the close
    /// the change is measured against.
    async fn latest_from_connector(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let response = self.connector.get_quote_range(ticker, "1d", "5d").await?;
        let bars = response.quotes()?;
        let last = bars
            .last()
            .ok_or_else(|| MarketDataError::NotFound(format!("No quotes for {}", ticker)))?;

        let price = Self::decimal_from(last.close);
        let previous_close = if bars.len() >= 2 {
            Some(Self::decimal_from(bars[bars.len() - 2].close))
        } else {
            None
        };

        Ok(Self::build_quote(
            ticker,
            price,
            previous_close,
            detect_currency(ticker).to_string(),
            Self::timestamp_to_utc(last.timestamp),
        ))
    }

    /// Backup path over the public chart endpoint, for tickers the
    /// connector rejects.
    async fn latest_from_chart_api(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/{}", CHART_API_URL, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?;
        let payload: ChartResponse = response.json().await?;

        let data = payload
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| {
                let description = payload
                    .chart
                    .error
                    .and_then(|e| e.description)
                    .unwrap_or_else(|| "empty chart result".to_string());
                MarketDataError::NotFound(format!("{}: {}", ticker, description))
            })?;

        let meta = data.meta;
        let price = meta
            .regular_market_price
            .map(Self::decimal_from)
            .ok_or_else(|| {
                MarketDataError::ParsingError(format!("No market price for {}", ticker))
            })?;
        let previous_close = meta
            .previous_close
            .or(meta.chart_previous_close)
            .and_then(Decimal::from_f64_retain);
        let currency = meta
            .currency
            .unwrap_or_else(|| detect_currency(ticker).to_string());
        let timestamp = meta
            .regular_market_time
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(Self::build_quote(
            ticker,
            price,
            previous_close,
            currency,
            timestamp,
        ))
    }
}

#[async_trait]
impl MarketDataProviderTrait for YahooProvider {
    fn id(&self) -> &'static str {
        DATA_SOURCE_YAHOO
    }

    async fn get_latest_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        match self.latest_from_connector(ticker).await {
            Ok(quote) => Ok(quote),
            Err(err) => {
                debug!(
                    "Connector quote failed for {}: {}. Trying chart API.",
                    ticker, err
                );
                self.latest_from_chart_api(ticker).await
            }
        }
    }

    async fn get_historical_quotes(
        &self,
        ticker: &str,
        range: HistoryRange,
        interval: HistoryInterval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let response = self
            .connector
            .get_quote_range(ticker, interval.as_str(), range.as_str())
            .await?;

        let mut candles: Vec<Candle> = response
            .quotes()?
            .into_iter()
            .map(|bar| Candle {
                date: Self::timestamp_to_utc(bar.timestamp),
                open: Self::decimal_from(bar.open),
                high: Self::decimal_from(bar.high),
                low: Self::decimal_from(bar.low),
                close: Self::decimal_from(bar.close),
                volume: bar.volume,
            })
            .collect();
        candles.sort_by_key(|c| c.date);

        Ok(candles)
    }

    async fn get_fx_rate(&self, from: &str, to: &str) -> Result<Decimal, MarketDataError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let pair = format!("{}{}=X", from, to);
        let quote = self.get_latest_quote(&pair).await?;
        if quote.price.is_zero() {
            return Err(MarketDataError::InvalidData(format!(
                "Zero exchange rate for {}",
                pair
            )));
        }
        Ok(quote.price)
    }

    async fn get_profile(&self, ticker: &str) -> Result<TickerProfile, MarketDataError> {
        let result = self.connector.search_ticker(ticker).await?;

        for item in &result.quotes {
            if item.symbol == ticker {
                let name = if item.long_name.is_empty() {
                    item.short_name.clone()
                } else {
                    item.long_name.clone()
                };
                return Ok(TickerProfile {
                    ticker: item.symbol.clone(),
                    name: Some(name),
                    exchange: Some(item.exchange.clone()),
                    quote_type: Some(item.quote_type.clone()),
                    currency: Some(detect_currency(ticker).to_string()),
                });
            }
        }

        Err(MarketDataError::NotFound(format!(
            "No profile for {}",
            ticker
        )))
    }

    async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>, MarketDataError> {
        let result = self.connector.search_ticker(ticker).await?;

        let items = result
            .news
            .into_iter()
            .map(|item| NewsItem {
                id: item.uuid,
                ticker: ticker.to_string(),
                title: item.title,
                url: item.link,
                published_at: Self::timestamp_to_utc(item.provider_publish_time),
                source: item.publisher,
                sentiment: None,
            })
            .collect();

        Ok(items)
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_time: Option<i64>,
}
