#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::fx::Currency;
    use crate::market_data::Quote;
    use crate::portfolios::{NewPortfolio, PortfolioRepository, PortfolioRepositoryTrait};
    use crate::watchlists::{
        AddWatchlistEntryRequest, WatchlistRepository, WatchlistService, WatchlistServiceTrait,
    };

    const PORTFOLIO_ID: &str = "portfolio-1";

    async fn setup() -> WatchlistService {
        let portfolio_repository = Arc::new(PortfolioRepository::new());
        portfolio_repository
            .create(NewPortfolio {
                id: Some(PORTFOLIO_ID.to_string()),
                user_id: "user-1".to_string(),
                name: "Main".to_string(),
                base_currency: Currency::USD,
                benchmark: None,
                risk_free_rate: None,
            })
            .await
            .unwrap();
        WatchlistService::new(Arc::new(WatchlistRepository::new()), portfolio_repository)
    }

    fn add_request(ticker: &str) -> AddWatchlistEntryRequest {
        AddWatchlistEntryRequest {
            ticker: ticker.to_string(),
            name: None,
            notes: None,
        }
    }

    fn quote(ticker: &str, price: rust_decimal::Decimal) -> Quote {
        Quote {
            ticker: ticker.to_string(),
            price,
            change: dec!(1.5),
            change_percent: dec!(0.85),
            currency: "USD".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_normalizes_and_rejects_duplicates() {
        let service = setup().await;
        let entry = service
            .add_entry(PORTFOLIO_ID, add_request(" nvda "))
            .await
            .unwrap();
        assert_eq!(entry.ticker, "NVDA");
        assert_eq!(entry.current_price, None);

        let duplicate = service.add_entry(PORTFOLIO_ID, add_request("nvda")).await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn refresh_updates_only_fetched_tickers() {
        let service = setup().await;
        service
            .add_entry(PORTFOLIO_ID, add_request("NVDA"))
            .await
            .unwrap();
        service
            .add_entry(PORTFOLIO_ID, add_request("TSLA"))
            .await
            .unwrap();

        // First refresh prices both tickers
        let mut quotes = HashMap::new();
        quotes.insert("NVDA".to_string(), quote("NVDA", dec!(500)));
        quotes.insert("TSLA".to_string(), quote("TSLA", dec!(200)));
        service
            .refresh_snapshots(PORTFOLIO_ID, &quotes)
            .await
            .unwrap();

        // Second refresh only carries NVDA; TSLA keeps its snapshot
        let mut quotes = HashMap::new();
        quotes.insert("NVDA".to_string(), quote("NVDA", dec!(510)));
        let entries = service
            .refresh_snapshots(PORTFOLIO_ID, &quotes)
            .await
            .unwrap();

        let nvda = entries.iter().find(|e| e.ticker == "NVDA").unwrap();
        let tsla = entries.iter().find(|e| e.ticker == "TSLA").unwrap();
        assert_eq!(nvda.current_price, Some(dec!(510)));
        assert_eq!(tsla.current_price, Some(dec!(200)));
    }

    #[tokio::test]
    async fn remove_then_list_is_empty() {
        let service = setup().await;
        let entry = service
            .add_entry(PORTFOLIO_ID, add_request("NVDA"))
            .await
            .unwrap();

        service.remove_entry(&entry.id).await.unwrap();
        assert!(service.list_entries(PORTFOLIO_ID).unwrap().is_empty());

        let missing = service.remove_entry(&entry.id).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn unknown_portfolio_is_rejected() {
        let service = setup().await;
        let result = service.add_entry("missing", add_request("NVDA")).await;
        assert!(result.is_err());
    }
}
