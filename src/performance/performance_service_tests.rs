#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::fx::Currency;
    use crate::market_data::{Candle, ManualProvider, MarketDataService, Quote};
    use crate::performance::{PerformanceService, PerformanceServiceTrait};
    use crate::portfolios::{NewPortfolio, PortfolioRepository, PortfolioRepositoryTrait};
    use crate::positions::{
        AssetType, CreatePositionRequest, PositionRepository, PositionService,
        PositionServiceTrait,
    };
    use crate::transactions::{
        CreateTransactionRequest, SignConventions, TransactionRepository, TransactionService,
        TransactionServiceTrait, TransactionType,
    };

    const PORTFOLIO_ID: &str = "portfolio-1";

    struct Fixture {
        provider: Arc<ManualProvider>,
        positions: PositionService,
        transactions: Arc<TransactionService>,
        performance: PerformanceService,
    }

    async fn setup() -> Fixture {
        let provider = Arc::new(ManualProvider::new());
        let market_data = Arc::new(MarketDataService::new(provider.clone()));
        let portfolio_repository = Arc::new(PortfolioRepository::new());
        let position_repository = Arc::new(PositionRepository::new());
        let transaction_repository = Arc::new(TransactionRepository::new());

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

        let positions = PositionService::new(
            position_repository.clone(),
            portfolio_repository.clone(),
        );
        let transactions = Arc::new(TransactionService::new(
            transaction_repository,
            portfolio_repository.clone(),
            position_repository.clone(),
            SignConventions::default(),
        ));
        let performance = PerformanceService::new(
            portfolio_repository,
            position_repository,
            transactions.clone(),
            market_data,
        );

        Fixture {
            provider,
            positions,
            transactions,
            performance,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candle(day: NaiveDate, close: Decimal) -> Candle {
        Candle {
            date: day.and_hms_opt(21, 0, 0).unwrap().and_utc(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn quote(ticker: &str, price: Decimal, change: Decimal) -> Quote {
        Quote {
            ticker: ticker.to_string(),
            price,
            change,
            change_percent: dec!(1),
            currency: "USD".to_string(),
            timestamp: Utc::now(),
        }
    }

    async fn seed_position(
        fixture: &Fixture,
        ticker: &str,
        quantity: Decimal,
        avg_cost: Decimal,
    ) {
        fixture
            .positions
            .create_position(
                PORTFOLIO_ID,
                CreatePositionRequest {
                    ticker: ticker.to_string(),
                    quantity,
                    avg_cost,
                    currency: Currency::USD,
                    name: None,
                    asset_type: AssetType::Equity,
                    broker: None,
                    tags: Vec::new(),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    async fn revalue(fixture: &Fixture, quotes: Vec<Quote>) {
        let map: HashMap<String, Quote> =
            quotes.into_iter().map(|q| (q.ticker.clone(), q)).collect();
        fixture
            .positions
            .revalue_portfolio(PORTFOLIO_ID, &map)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn metrics_cover_aggregates_series_and_flows() {
        let fixture = setup().await;
        fixture.provider.set_candles(
            "AAPL",
            vec![
                candle(date(2024, 1, 1), dec!(100)),
                candle(date(2024, 7, 1), dec!(110)),
                candle(date(2024, 12, 31), dec!(165)),
            ],
        );
        fixture.provider.set_candles(
            "SPY",
            vec![
                candle(date(2024, 1, 1), dec!(100)),
                candle(date(2024, 7, 1), dec!(105)),
                candle(date(2024, 12, 31), dec!(120)),
            ],
        );
        seed_position(&fixture, "AAPL", dec!(10), dec!(100)).await;
        revalue(&fixture, vec![quote("AAPL", dec!(165), dec!(5))]).await;
        fixture
            .transactions
            .create_transaction(
                PORTFOLIO_ID,
                CreateTransactionRequest {
                    position_id: None,
                    ticker: None,
                    transaction_type: TransactionType::Deposit,
                    date: date(2024, 1, 1),
                    quantity: dec!(1),
                    price: dec!(1000),
                    currency: Currency::USD,
                    fees: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let metrics = fixture
            .performance
            .calculate_portfolio_metrics(PORTFOLIO_ID)
            .await
            .unwrap();

        assert_eq!(metrics.total_value, dec!(1650));
        assert_eq!(metrics.total_pnl, dec!(650));
        assert_eq!(metrics.total_pnl_percent, dec!(65));
        assert_eq!(metrics.daily_pnl, dec!(50));
        assert_eq!(metrics.daily_pnl_percent, dec!(3.0303));

        assert!(metrics.excluded_tickers.is_empty());
        assert_eq!(metrics.period_start_date, Some(date(2024, 1, 1)));
        assert_eq!(metrics.period_end_date, Some(date(2024, 12, 31)));

        // 10% then 50%, the opening deposit is already in the start value
        assert_eq!(metrics.twr, Some(dec!(0.65)));
        // -1000 against +1650 exactly 365 days later
        assert!((metrics.irr.unwrap() - dec!(0.65)).abs() < dec!(0.0001));
        // 5th percentile of [0.1, 0.5] is 0.12, scaled by 1650
        assert_eq!(metrics.var_95, Some(dec!(198)));
        assert_eq!(metrics.max_drawdown, Some(Decimal::ZERO));

        assert!(metrics.volatility_30d.is_some());
        assert!(metrics.sharpe_ratio.is_some());
        assert!(metrics.beta.is_some());
        // Both observed returns beat the risk-free floor
        assert_eq!(metrics.sortino_ratio, None);
    }

    #[tokio::test]
    async fn history_gaps_exclude_tickers_but_keep_their_value() {
        let fixture = setup().await;
        fixture.provider.set_candles(
            "AAPL",
            vec![
                candle(date(2024, 1, 1), dec!(100)),
                candle(date(2024, 7, 1), dec!(110)),
                candle(date(2024, 12, 31), dec!(165)),
            ],
        );
        seed_position(&fixture, "AAPL", dec!(10), dec!(100)).await;
        seed_position(&fixture, "PRIVATECO", dec!(5), dec!(150)).await;
        revalue(
            &fixture,
            vec![
                quote("AAPL", dec!(165), dec!(5)),
                quote("PRIVATECO", dec!(200), dec!(0)),
            ],
        )
        .await;

        let metrics = fixture
            .performance
            .calculate_portfolio_metrics(PORTFOLIO_ID)
            .await
            .unwrap();

        assert_eq!(metrics.excluded_tickers, vec!["PRIVATECO".to_string()]);
        assert_eq!(metrics.total_value, dec!(2650));
        assert_eq!(metrics.total_pnl, dec!(900));
        assert_eq!(metrics.daily_pnl, dec!(50));

        // The series metrics run on AAPL alone; no flows, so no XIRR
        assert_eq!(metrics.twr, Some(dec!(0.65)));
        assert_eq!(metrics.irr, None);
    }

    #[tokio::test]
    async fn unknown_portfolio_is_rejected() {
        let fixture = setup().await;
        let result = fixture
            .performance
            .calculate_portfolio_metrics("no-such-portfolio")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn risk_enrichment_persists_volatility_and_beta() {
        let fixture = setup().await;
        let start = date(2024, 3, 1);
        let mut aapl = Vec::new();
        let mut spy = Vec::new();
        for i in 0..40i64 {
            let day = start + Duration::days(i);
            aapl.push(candle(day, dec!(100) + Decimal::from(i % 3)));
            spy.push(candle(day, dec!(50) + Decimal::from((i + 1) % 3)));
        }
        fixture.provider.set_candles("AAPL", aapl);
        fixture.provider.set_candles("SPY", spy);

        seed_position(&fixture, "AAPL", dec!(10), dec!(100)).await;
        seed_position(&fixture, "PRIVATECO", dec!(5), dec!(150)).await;

        let enriched = fixture
            .performance
            .enrich_position_risk(PORTFOLIO_ID)
            .await
            .unwrap();

        let aapl = enriched.iter().find(|p| p.ticker == "AAPL").unwrap();
        assert!(aapl.volatility_30d.is_some());
        assert!(aapl.volatility_90d.is_some());
        assert!(aapl.beta.is_some());

        let private = enriched.iter().find(|p| p.ticker == "PRIVATECO").unwrap();
        assert_eq!(private.volatility_30d, None);
        assert_eq!(private.beta, None);

        // The enrichment is persisted, not just returned
        let stored = fixture.positions.get_position(&aapl.id).unwrap();
        assert_eq!(stored.volatility_30d, aapl.volatility_30d);
        assert_eq!(stored.beta, aapl.beta);
    }
}
