//! Transactions module - the immutable ledger, its sign conventions and
//! the external-flow series for performance math.

pub(crate) mod sign_conventions;
pub(crate) mod transactions_errors;
pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;
pub(crate) mod transactions_service;
pub(crate) mod transactions_traits;

#[cfg(test)]
mod transactions_service_tests;

pub use sign_conventions::{
    external_cash_flows, is_external_flow, CashFlow, CashFlowDirection, FeeTreatment,
    SignConventions, TypePolicy,
};
pub use transactions_errors::TransactionError;
pub use transactions_model::{CreateTransactionRequest, Transaction, TransactionType};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
