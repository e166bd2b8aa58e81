#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    use crate::fx::Currency;
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
        transactions: TransactionService,
        positions: PositionService,
    }

    async fn setup() -> Fixture {
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

        let position_repository = Arc::new(PositionRepository::new());
        let positions = PositionService::new(
            position_repository.clone(),
            portfolio_repository.clone(),
        );
        let transactions = TransactionService::new(
            Arc::new(TransactionRepository::new()),
            portfolio_repository,
            position_repository,
            SignConventions::default(),
        );
        Fixture {
            transactions,
            positions,
        }
    }

    fn request(
        transaction_type: TransactionType,
        quantity: Decimal,
        price: Decimal,
        fees: Option<Decimal>,
    ) -> CreateTransactionRequest {
        CreateTransactionRequest {
            position_id: None,
            ticker: None,
            transaction_type,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            quantity,
            price,
            currency: Currency::USD,
            fees,
            notes: None,
        }
    }

    #[tokio::test]
    async fn buy_total_value_includes_fees() {
        let fixture = setup().await;
        let mut buy = request(TransactionType::Buy, dec!(50), dec!(150), Some(dec!(1.5)));
        buy.ticker = Some("AAPL".to_string());

        let transaction = fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, buy)
            .await
            .unwrap();

        assert_eq!(transaction.total_value, dec!(7501.5));
        assert_eq!(transaction.ticker.as_deref(), Some("AAPL"));
        assert_eq!(transaction.position_id, None);
    }

    #[tokio::test]
    async fn ticker_is_linked_to_an_existing_position() {
        let fixture = setup().await;
        let position = fixture
            .positions
            .create_position(
                PORTFOLIO_ID,
                CreatePositionRequest {
                    ticker: "AAPL".to_string(),
                    quantity: dec!(50),
                    avg_cost: dec!(150),
                    currency: Currency::USD,
                    name: None,
                    asset_type: AssetType::Equity,
                    broker: None,
                    tags: vec![],
                    notes: None,
                },
            )
            .await
            .unwrap();

        let mut buy = request(TransactionType::Buy, dec!(10), dec!(160), None);
        buy.ticker = Some("aapl".to_string());
        let transaction = fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, buy)
            .await
            .unwrap();

        assert_eq!(transaction.position_id.as_deref(), Some(position.id.as_str()));
        assert_eq!(transaction.ticker.as_deref(), Some("AAPL"));
    }

    #[tokio::test]
    async fn ledger_entry_outlives_its_position() {
        let fixture = setup().await;
        let position = fixture
            .positions
            .create_position(
                PORTFOLIO_ID,
                CreatePositionRequest {
                    ticker: "MSFT".to_string(),
                    quantity: dec!(5),
                    avg_cost: dec!(300),
                    currency: Currency::USD,
                    name: None,
                    asset_type: AssetType::Equity,
                    broker: None,
                    tags: vec![],
                    notes: None,
                },
            )
            .await
            .unwrap();

        let mut buy = request(TransactionType::Buy, dec!(5), dec!(300), None);
        buy.position_id = Some(position.id.clone());
        let transaction = fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, buy)
            .await
            .unwrap();

        fixture.positions.delete_position(&position.id).await.unwrap();

        let stored = fixture
            .transactions
            .get_transaction(&transaction.id)
            .unwrap();
        assert_eq!(stored.ticker.as_deref(), Some("MSFT"));
    }

    #[tokio::test]
    async fn instrument_entry_without_reference_is_rejected() {
        let fixture = setup().await;
        let result = fixture
            .transactions
            .create_transaction(
                PORTFOLIO_ID,
                request(TransactionType::Buy, dec!(1), dec!(100), None),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn cash_entries_need_no_reference() {
        let fixture = setup().await;
        let deposit = fixture
            .transactions
            .create_transaction(
                PORTFOLIO_ID,
                request(TransactionType::Deposit, dec!(1), dec!(1000), None),
            )
            .await
            .unwrap();

        assert_eq!(deposit.position_id, None);
        assert_eq!(deposit.ticker, None);
        assert_eq!(deposit.total_value, dec!(1000));
    }

    #[tokio::test]
    async fn external_flow_series_is_signed_and_dated() {
        let fixture = setup().await;
        fixture
            .transactions
            .create_transaction(
                PORTFOLIO_ID,
                request(TransactionType::Deposit, dec!(1), dec!(1000), None),
            )
            .await
            .unwrap();
        let mut withdrawal = request(TransactionType::Withdrawal, dec!(1), dec!(250), None);
        withdrawal.date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, withdrawal)
            .await
            .unwrap();
        let mut buy = request(TransactionType::Buy, dec!(10), dec!(50), None);
        buy.ticker = Some("VOO".to_string());
        fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, buy)
            .await
            .unwrap();

        let flows = fixture
            .transactions
            .external_cash_flows(PORTFOLIO_ID)
            .unwrap();

        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].amount, dec!(1000));
        assert_eq!(flows[1].amount, dec!(-250));
        assert!(flows[0].date < flows[1].date);
    }

    #[tokio::test]
    async fn unknown_portfolio_is_rejected() {
        let fixture = setup().await;
        let result = fixture
            .transactions
            .create_transaction(
                "missing",
                request(TransactionType::Deposit, dec!(1), dec!(100), None),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn position_from_another_portfolio_is_rejected() {
        let fixture = setup().await;
        let mut buy = request(TransactionType::Buy, dec!(1), dec!(100), None);
        buy.position_id = Some("unknown-position".to_string());
        let result = fixture
            .transactions
            .create_transaction(PORTFOLIO_ID, buy)
            .await;
        assert!(result.is_err());
    }
}
