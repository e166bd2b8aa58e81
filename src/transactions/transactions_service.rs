use chrono::Utc;
use log::debug;
use std::sync::Arc;

use super::sign_conventions::{external_cash_flows, CashFlow, SignConventions};
use super::transactions_model::{CreateTransactionRequest, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::portfolios::PortfolioRepositoryTrait;
use crate::positions::PositionRepositoryTrait;
use crate::transactions::TransactionError;

/// Service for recording and reading the transaction ledger
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    conventions: SignConventions,
}

impl TransactionService {
    /// Creates a new TransactionService instance
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        conventions: SignConventions,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
            position_repository,
            conventions,
        }
    }

    /// The sign conventions this ledger records totals under.
    pub fn conventions(&self) -> &SignConventions {
        &self.conventions
    }

    /// Resolves the (position_id, ticker) pair for a new entry.
    ///
    /// A position id wins when both are given; a bare ticker is linked to
    /// the matching position when one exists, otherwise recorded alone so
    /// the entry stays meaningful after the position is gone.
    fn resolve_reference(
        &self,
        portfolio_id: &str,
        request: &CreateTransactionRequest,
    ) -> Result<(Option<String>, Option<String>)> {
        if let Some(position_id) = &request.position_id {
            let position = self.position_repository.get_by_id(position_id)?;
            if position.portfolio_id != portfolio_id {
                return Err(TransactionError::InvalidData(format!(
                    "Position '{}' belongs to another portfolio",
                    position_id
                ))
                .into());
            }
            return Ok((Some(position.id), Some(position.ticker)));
        }

        if let Some(ticker) = request.normalized_ticker() {
            let linked = self
                .position_repository
                .get_by_ticker(portfolio_id, &ticker)?
                .map(|p| p.id);
            return Ok((linked, Some(ticker)));
        }

        if request.transaction_type.references_instrument() {
            return Err(Error::Validation(ValidationError::MissingField(
                "positionId or ticker".to_string(),
            )));
        }
        Ok((None, None))
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    /// Records a new ledger entry
    async fn create_transaction(
        &self,
        portfolio_id: &str,
        request: CreateTransactionRequest,
    ) -> Result<Transaction> {
        request.validate()?;
        self.portfolio_repository.get_by_id(portfolio_id)?;
        let (position_id, ticker) = self.resolve_reference(portfolio_id, &request)?;

        let fees = request.fees_or_zero();
        let total_value = self.conventions.total_value(
            request.transaction_type,
            request.quantity,
            request.price,
            fees,
        );
        debug!(
            "Recording {:?} in portfolio {}: total_value {}",
            request.transaction_type, portfolio_id, total_value
        );

        let transaction = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            position_id,
            ticker,
            transaction_type: request.transaction_type,
            date: request.date,
            quantity: request.quantity,
            price: request.price,
            currency: request.currency,
            fees,
            notes: request.notes,
            total_value,
            created_at: Utc::now(),
        };

        self.repository.create(transaction).await
    }

    /// Retrieves an entry by its ID
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    /// Lists a portfolio's entries, oldest first
    fn list_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Lists the entries recorded against one position
    fn list_transactions_for_position(&self, position_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_by_position(position_id)
    }

    /// The portfolio's dated external-flow series
    fn external_cash_flows(&self, portfolio_id: &str) -> Result<Vec<CashFlow>> {
        let transactions = self.repository.list_by_portfolio(portfolio_id)?;
        Ok(external_cash_flows(&transactions, &self.conventions))
    }
}
