//! Property-based integration tests for valuation arithmetic.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use dashfolio_core::alerts::{Alert, AlertType};
use dashfolio_core::fx::Currency;
use dashfolio_core::market_data::{
    GetQuotesRequest, ManualProvider, MarketDataService, MarketDataServiceTrait, Quote,
};
use dashfolio_core::performance::{calculate_metrics, MetricsInputs};
use dashfolio_core::portfolios::{NewPortfolio, PortfolioRepository, PortfolioRepositoryTrait};
use dashfolio_core::positions::{
    AssetType, CreatePositionRequest, Position, PositionRepository, PositionService,
    PositionServiceTrait,
};
use dashfolio_core::transactions::{CashFlow, SignConventions, TransactionType};

// =============================================================================
// Generators
// =============================================================================

/// Generates a positive quantity with up to three decimal places.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000, 0u32..=3).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generates a positive price with up to two decimal places.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000, 0u32..=2).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generates a fee amount, zero included.
fn arb_fees() -> impl Strategy<Value = Decimal> {
    (0i64..10_000, 0u32..=2).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generates a daily close in a band tight enough that chained growth
/// factors stay well inside Decimal's range.
fn arb_close() -> impl Strategy<Value = Decimal> {
    (5_000i64..20_000).prop_map(|mantissa| Decimal::new(mantissa, 2))
}

/// Generates a transaction type.
fn arb_transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Buy),
        Just(TransactionType::Sell),
        Just(TransactionType::Dividend),
        Just(TransactionType::Fee),
        Just(TransactionType::Deposit),
        Just(TransactionType::Withdrawal),
    ]
}

/// Generates a holdings book: distinct tickers, each with a quantity,
/// an average cost and a quoted price.
fn arb_book(max: usize) -> impl Strategy<Value = Vec<(String, Decimal, Decimal, Decimal)>> {
    proptest::collection::hash_set("[A-Z]{2,5}", 1..=max).prop_flat_map(|tickers| {
        let tickers: Vec<String> = tickers.into_iter().collect();
        let len = tickers.len();
        proptest::collection::vec((arb_quantity(), arb_price(), arb_price()), len).prop_map(
            move |values| {
                tickers
                    .iter()
                    .cloned()
                    .zip(values)
                    .map(|(ticker, (quantity, avg_cost, price))| (ticker, quantity, avg_cost, price))
                    .collect()
            },
        )
    })
}

// =============================================================================
// Fixtures
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn quote_for(ticker: &str, price: Decimal) -> Quote {
    Quote {
        ticker: ticker.to_string(),
        price,
        change: Decimal::ZERO,
        change_percent: Decimal::ZERO,
        currency: "USD".to_string(),
        timestamp: Utc::now(),
    }
}

/// Seeds a fresh portfolio with the given book, applies the quotes for
/// the tickers in `priced`, and returns the revalued positions.
async fn revalue_book(
    book: &[(String, Decimal, Decimal, Decimal)],
    priced: &HashSet<String>,
) -> Vec<Position> {
    let portfolio_repository = Arc::new(PortfolioRepository::new());
    let position_repository = Arc::new(PositionRepository::new());
    let portfolio = portfolio_repository
        .create(NewPortfolio {
            id: None,
            user_id: "prop".to_string(),
            name: "Book".to_string(),
            base_currency: Currency::USD,
            benchmark: None,
            risk_free_rate: None,
        })
        .await
        .unwrap();
    let service = PositionService::new(position_repository, portfolio_repository);

    for (ticker, quantity, avg_cost, _) in book {
        service
            .create_position(
                &portfolio.id,
                CreatePositionRequest {
                    ticker: ticker.clone(),
                    quantity: *quantity,
                    avg_cost: *avg_cost,
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

    let quotes: HashMap<String, Quote> = book
        .iter()
        .filter(|(ticker, ..)| priced.contains(ticker))
        .map(|(ticker, _, _, price)| (ticker.clone(), quote_for(ticker, *price)))
        .collect();
    service
        .revalue_portfolio(&portfolio.id, &quotes)
        .await
        .unwrap()
}

/// A position literal carrying only the fields the aggregates read.
fn valued_position(ticker: &str, cost_basis: Decimal, market: Option<(Decimal, Decimal)>) -> Position {
    let now = Utc::now();
    Position {
        id: format!("pos-{}", ticker),
        portfolio_id: "portfolio-1".to_string(),
        ticker: ticker.to_string(),
        name: None,
        asset_type: AssetType::Equity,
        currency: Currency::USD,
        quantity: Decimal::ONE,
        avg_cost: cost_basis,
        broker: None,
        tags: vec![],
        notes: None,
        cost_basis,
        current_price: None,
        current_value: market.map(|(value, _)| value),
        unrealized_pnl: None,
        unrealized_pnl_percent: None,
        daily_change: market.map(|(_, change)| change),
        daily_change_percent: None,
        weight: None,
        volatility_30d: None,
        volatility_90d: None,
        beta: None,
        last_price_update: None,
        created_at: now,
        updated_at: now,
    }
}

fn metrics_inputs(
    positions: Vec<Position>,
    price_history: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
    cash_flows: Vec<CashFlow>,
) -> MetricsInputs {
    MetricsInputs {
        portfolio_id: "portfolio-1".to_string(),
        positions,
        price_history,
        benchmark_history: BTreeMap::new(),
        risk_free_rate: dec!(0.03),
        cash_flows,
    }
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Feature: valuation, Property 1: Revaluation follows the arithmetic**
    ///
    /// After a revaluation, every priced position must satisfy
    /// `costBasis == quantity × avgCost`, `currentValue == quantity × price`
    /// and `unrealizedPnL == currentValue − costBasis` exactly.
    #[test]
    fn prop_revaluation_follows_the_arithmetic(book in arb_book(6)) {
        let priced: HashSet<String> = book.iter().map(|(t, ..)| t.clone()).collect();
        let positions = runtime().block_on(revalue_book(&book, &priced));

        prop_assert_eq!(positions.len(), book.len());
        for (ticker, quantity, avg_cost, price) in &book {
            let position = positions.iter().find(|p| &p.ticker == ticker).unwrap();
            prop_assert_eq!(position.cost_basis, quantity * avg_cost);
            prop_assert_eq!(position.current_value, Some(quantity * price));
            prop_assert_eq!(
                position.unrealized_pnl,
                Some(quantity * price - quantity * avg_cost)
            );
        }
    }

    /// **Feature: valuation, Property 2: Weights sum to one hundred**
    ///
    /// When every position is priced and the book has any value, the
    /// weights must sum to 100 up to per-position rounding.
    #[test]
    fn prop_weights_sum_to_one_hundred_when_fully_priced(book in arb_book(8)) {
        let priced: HashSet<String> = book.iter().map(|(t, ..)| t.clone()).collect();
        let positions = runtime().block_on(revalue_book(&book, &priced));

        let sum: Decimal = positions.iter().filter_map(|p| p.weight).sum();
        let tolerance = Decimal::new(positions.len() as i64, 4);
        prop_assert!(
            (sum - dec!(100)).abs() <= tolerance,
            "weights summed to {}",
            sum
        );
    }

    /// **Feature: valuation, Property 3: One missing quote clears every weight**
    ///
    /// Weights are a share of total portfolio value; with any unpriced
    /// position that total is unknown, so no position may carry a weight.
    #[test]
    fn prop_missing_quote_clears_every_weight(book in arb_book(6)) {
        prop_assume!(book.len() >= 2);
        let mut priced: HashSet<String> = book.iter().map(|(t, ..)| t.clone()).collect();
        priced.remove(&book[0].0);
        let positions = runtime().block_on(revalue_book(&book, &priced));

        for position in &positions {
            prop_assert_eq!(position.weight, None);
        }
    }

    /// **Feature: valuation, Property 4: Entry totals follow the fee policy**
    ///
    /// Under the default conventions, fee-bearing acquisitions record
    /// `quantity × price + fees` and proceeds record `quantity × price − fees`.
    #[test]
    fn prop_entry_totals_follow_the_fee_policy(
        transaction_type in arb_transaction_type(),
        quantity in arb_quantity(),
        price in arb_price(),
        fees in arb_fees(),
    ) {
        let conventions = SignConventions::default();
        let total = conventions.total_value(transaction_type, quantity, price, fees);
        let gross = quantity * price;

        match transaction_type {
            TransactionType::Buy | TransactionType::Fee | TransactionType::Withdrawal => {
                prop_assert_eq!(total, gross + fees);
            }
            TransactionType::Sell | TransactionType::Dividend | TransactionType::Deposit => {
                prop_assert_eq!(total, gross - fees);
            }
        }
    }

    /// **Feature: valuation, Property 5: Batch quotes partition the request**
    ///
    /// Every requested ticker lands in exactly one of `quotes` or `errors`,
    /// and a ticker's side is decided by whether the provider knows it.
    #[test]
    fn prop_batch_quotes_partition_the_request(
        known in proptest::collection::hash_set("[A-H]{2,4}", 0..6),
        unknown in proptest::collection::hash_set("[J-Q]{2,4}", 0..6),
    ) {
        let response = runtime().block_on(async {
            let provider = Arc::new(ManualProvider::new());
            for ticker in &known {
                provider.set_quote(quote_for(ticker, dec!(10)));
            }
            let service = MarketDataService::new(provider);
            let tickers: Vec<String> = known.iter().chain(unknown.iter()).cloned().collect();
            service.get_quotes(GetQuotesRequest { tickers }).await.unwrap()
        });

        let quoted: HashSet<String> = response.quotes.iter().map(|q| q.ticker.clone()).collect();
        let failed: HashSet<String> = response.errors.iter().map(|e| e.ticker.clone()).collect();

        prop_assert_eq!(
            response.quotes.len() + response.errors.len(),
            known.len() + unknown.len()
        );
        prop_assert_eq!(quoted, known);
        prop_assert_eq!(failed, unknown);
    }

    /// **Feature: valuation, Property 6: Aggregates are plain sums**
    ///
    /// Portfolio totals must equal the sums over positions, with unpriced
    /// positions counting zero, and every ticker without price history
    /// must be named in `excludedTickers`.
    #[test]
    fn prop_money_aggregates_are_sums(
        book in arb_book(8),
        priced_mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let positions: Vec<Position> = book
            .iter()
            .zip(priced_mask.iter())
            .map(|((ticker, quantity, avg_cost, price), priced)| {
                let market = priced.then(|| (quantity * price, quantity * (price - avg_cost)));
                valued_position(ticker, quantity * avg_cost, market)
            })
            .collect();

        let expected_value: Decimal = positions
            .iter()
            .filter_map(|p| p.current_value)
            .sum();
        let expected_cost: Decimal = positions.iter().map(|p| p.cost_basis).sum();
        let expected_daily: Decimal = positions.iter().filter_map(|p| p.daily_change).sum();

        let metrics = calculate_metrics(&metrics_inputs(positions.clone(), HashMap::new(), vec![]));

        prop_assert_eq!(metrics.total_value, expected_value.round_dp(2));
        prop_assert_eq!(metrics.total_pnl, (expected_value - expected_cost).round_dp(2));
        prop_assert_eq!(metrics.daily_pnl, expected_daily.round_dp(2));

        // No history was supplied, so every ticker is excluded
        let excluded: HashSet<String> = metrics.excluded_tickers.iter().cloned().collect();
        let all: HashSet<String> = positions.iter().map(|p| p.ticker.clone()).collect();
        prop_assert_eq!(excluded, all);
    }

    /// **Feature: valuation, Property 7: Time-weighted return is scale invariant**
    ///
    /// Multiplying every close and every flow by the same factor leaves
    /// the time-weighted return unchanged.
    #[test]
    fn prop_twr_is_scale_invariant(
        closes in proptest::collection::vec(arb_close(), 3..10),
        factor in (1i64..1000, 0u32..=2).prop_map(|(m, s)| Decimal::new(m, s)),
        flow in arb_close(),
    ) {
        let metrics_at = |scale: Decimal| {
            let series: BTreeMap<NaiveDate, Decimal> = closes
                .iter()
                .enumerate()
                .map(|(i, close)| (day(i as i64), close * scale))
                .collect();
            let mut history = HashMap::new();
            history.insert("AAA".to_string(), series);
            let flows = vec![CashFlow { date: day(1), amount: flow * scale }];
            let position = valued_position("AAA", dec!(100), None);
            calculate_metrics(&metrics_inputs(vec![position], history, flows))
        };

        let base = metrics_at(Decimal::ONE).twr;
        let scaled = metrics_at(factor).twr;

        prop_assert!(base.is_some());
        let drift = (base.unwrap() - scaled.unwrap()).abs();
        prop_assert!(drift <= dec!(0.000001), "twr drifted by {}", drift);
    }

    /// **Feature: valuation, Property 8: Money-weighted return tracks the gain**
    ///
    /// For a single deposit held to a terminal value, the internal rate
    /// carries the sign of the gain.
    #[test]
    fn prop_irr_sign_tracks_gain(
        deposit in (100i64..100_000).prop_map(Decimal::from),
        factor in prop_oneof![30i64..=95, 105i64..=300].prop_map(|m| Decimal::new(m, 2)),
        span_days in 180i64..730,
    ) {
        let terminal = deposit * factor;
        let mut series = BTreeMap::new();
        series.insert(day(0), deposit);
        series.insert(day(span_days), terminal);
        let mut history = HashMap::new();
        history.insert("AAA".to_string(), series);
        let flows = vec![CashFlow { date: day(0), amount: deposit }];
        let position = valued_position("AAA", deposit, None);

        let metrics = calculate_metrics(&metrics_inputs(vec![position], history, flows));
        let irr = metrics.irr;

        prop_assert!(irr.is_some(), "no rate for factor {} over {} days", factor, span_days);
        if factor > Decimal::ONE {
            prop_assert!(irr.unwrap() > Decimal::ZERO);
        } else {
            prop_assert!(irr.unwrap() < Decimal::ZERO);
        }
    }

    /// **Feature: valuation, Property 9: Alert flags and timestamps move together**
    ///
    /// Along any walk of the lifecycle, `triggered` implies `triggeredAt`
    /// is set, `notified` implies both flags and both timestamps, and a
    /// reactivated alert carries neither.
    #[test]
    fn prop_alert_flags_and_timestamps_move_together(
        steps in proptest::collection::vec(0u8..3, 0..12),
    ) {
        let now = Utc::now();
        let mut alert = Alert {
            id: "alert-1".to_string(),
            portfolio_id: "portfolio-1".to_string(),
            ticker: Some("AAPL".to_string()),
            alert_type: AlertType::DropsBelow,
            target_price: Some(dec!(150)),
            target_change_percent: None,
            active: true,
            triggered: false,
            triggered_at: None,
            notified: false,
            notification_sent_at: None,
            created_at: now,
            updated_at: now,
        };

        for step in steps {
            // Illegal transitions are rejected and must not move the state
            match step {
                0 => { let _ = alert.trigger(Utc::now()); }
                1 => { let _ = alert.mark_notified(Utc::now()); }
                _ => alert.reactivate(Utc::now()),
            }

            prop_assert_eq!(alert.triggered, alert.triggered_at.is_some());
            prop_assert_eq!(alert.notified, alert.notification_sent_at.is_some());
            if alert.notified {
                prop_assert!(alert.triggered);
            }
            if alert.triggered {
                prop_assert!(!alert.active);
            }
        }
    }
}
