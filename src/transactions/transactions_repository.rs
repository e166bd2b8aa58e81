use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::transactions_model::Transaction;
use super::transactions_traits::TransactionRepositoryTrait;
use crate::errors::Result;
use crate::transactions::TransactionError;

/// In-memory repository for the transaction ledger, keyed by entry id.
#[derive(Default)]
pub struct TransactionRepository {
    store: RwLock<HashMap<String, Transaction>>,
}

impl TransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_ledger(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create(&self, transaction: Transaction) -> Result<Transaction> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if store.contains_key(&transaction.id) {
            return Err(TransactionError::InvalidData(format!(
                "Transaction with id '{}' already exists",
                transaction.id
            ))
            .into());
        }
        store.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let before = store.len();
        store.retain(|_, t| t.portfolio_id != portfolio_id);
        Ok(before - store.len())
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()).into())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut transactions: Vec<Transaction> = store
            .values()
            .filter(|t| t.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        sort_ledger(&mut transactions);
        Ok(transactions)
    }

    fn list_by_position(&self, position_id: &str) -> Result<Vec<Transaction>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut transactions: Vec<Transaction> = store
            .values()
            .filter(|t| t.position_id.as_deref() == Some(position_id))
            .cloned()
            .collect();
        sort_ledger(&mut transactions);
        Ok(transactions)
    }
}
