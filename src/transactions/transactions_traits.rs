//! Transaction repository and service traits.
//!
//! The ledger is append-only: neither trait exposes an update or a
//! single-entry delete. Entries leave storage only through the
//! portfolio-delete cascade.

use async_trait::async_trait;

use super::sign_conventions::CashFlow;
use super::transactions_model::{CreateTransactionRequest, Transaction};
use crate::errors::Result;

/// Trait defining the contract for Transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Persists a new ledger entry.
    async fn create(&self, transaction: Transaction) -> Result<Transaction>;

    /// Deletes every entry of a portfolio, returning how many went.
    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves an entry by its ID.
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists a portfolio's entries, oldest first.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;

    /// Lists the entries recorded against one position.
    fn list_by_position(&self, position_id: &str) -> Result<Vec<Transaction>>;
}

/// Trait defining the contract for Transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Records a new ledger entry with business validation, resolving
    /// the position/ticker reference and computing the total value.
    async fn create_transaction(
        &self,
        portfolio_id: &str,
        request: CreateTransactionRequest,
    ) -> Result<Transaction>;

    /// Retrieves an entry by ID.
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists a portfolio's entries, oldest first.
    fn list_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;

    /// Lists the entries recorded against one position.
    fn list_transactions_for_position(&self, position_id: &str) -> Result<Vec<Transaction>>;

    /// The portfolio's dated external-flow series (deposits positive,
    /// withdrawals negative), the input for TWR and money-weighted
    /// return calculations.
    fn external_cash_flows(&self, portfolio_id: &str) -> Result<Vec<CashFlow>>;
}
