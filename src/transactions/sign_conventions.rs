//! Sign and fee conventions for ledger entries.
//!
//! Two questions are policy rather than arithmetic: whether fees increase
//! the recorded amount or shrink it, and which side of the cash boundary
//! an entry sits on. Both are configurable per transaction type; nothing
//! else in the crate hard-codes a type's treatment.
//!
//! Only DEPOSIT and WITHDRAWAL cross the portfolio boundary. They form
//! the external-flow series consumed by time- and money-weighted return
//! calculations; BUY, SELL, DIVIDEND and FEE reallocate money that is
//! already inside the portfolio.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_model::{Transaction, TransactionType};
use crate::utils::decimal_serde::decimal_serde;

/// How a type's fees enter its recorded total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeTreatment {
    /// Fees increase the amount: `quantity × price + fees`
    AddToCost,
    /// Fees shrink the amount: `quantity × price − fees`
    DeductFromProceeds,
}

/// Which way cash moves for a type, seen from the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowDirection {
    Inflow,
    Outflow,
}

/// Per-type policy pairing a fee treatment with a cash direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypePolicy {
    pub fee_treatment: FeeTreatment,
    pub direction: CashFlowDirection,
}

/// The full convention table, one policy per transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignConventions {
    pub buy: TypePolicy,
    pub sell: TypePolicy,
    pub dividend: TypePolicy,
    pub fee: TypePolicy,
    pub deposit: TypePolicy,
    pub withdrawal: TypePolicy,
}

impl Default for SignConventions {
    fn default() -> Self {
        Self {
            buy: TypePolicy {
                fee_treatment: FeeTreatment::AddToCost,
                direction: CashFlowDirection::Outflow,
            },
            sell: TypePolicy {
                fee_treatment: FeeTreatment::DeductFromProceeds,
                direction: CashFlowDirection::Inflow,
            },
            dividend: TypePolicy {
                fee_treatment: FeeTreatment::DeductFromProceeds,
                direction: CashFlowDirection::Inflow,
            },
            fee: TypePolicy {
                fee_treatment: FeeTreatment::AddToCost,
                direction: CashFlowDirection::Outflow,
            },
            deposit: TypePolicy {
                fee_treatment: FeeTreatment::DeductFromProceeds,
                direction: CashFlowDirection::Inflow,
            },
            withdrawal: TypePolicy {
                fee_treatment: FeeTreatment::AddToCost,
                direction: CashFlowDirection::Outflow,
            },
        }
    }
}

impl SignConventions {
    /// The policy for one transaction type.
    pub fn policy(&self, transaction_type: TransactionType) -> TypePolicy {
        match transaction_type {
            TransactionType::Buy => self.buy,
            TransactionType::Sell => self.sell,
            TransactionType::Dividend => self.dividend,
            TransactionType::Fee => self.fee,
            TransactionType::Deposit => self.deposit,
            TransactionType::Withdrawal => self.withdrawal,
        }
    }

    /// Recorded total for an entry: `quantity × price ± fees`, the sign
    /// of the fee term given by the type's fee treatment. A magnitude,
    /// not a signed flow.
    pub fn total_value(
        &self,
        transaction_type: TransactionType,
        quantity: Decimal,
        price: Decimal,
        fees: Decimal,
    ) -> Decimal {
        let gross = quantity * price;
        match self.policy(transaction_type).fee_treatment {
            FeeTreatment::AddToCost => gross + fees,
            FeeTreatment::DeductFromProceeds => gross - fees,
        }
    }

    /// The entry's total as a signed cash amount, inflow positive.
    pub fn signed_amount(&self, transaction: &Transaction) -> Decimal {
        match self.policy(transaction.transaction_type).direction {
            CashFlowDirection::Inflow => transaction.total_value,
            CashFlowDirection::Outflow => -transaction.total_value,
        }
    }
}

/// True when the type moves money across the portfolio boundary.
pub fn is_external_flow(transaction_type: TransactionType) -> bool {
    matches!(
        transaction_type,
        TransactionType::Deposit | TransactionType::Withdrawal
    )
}

/// One dated external flow, signed from the portfolio's perspective
/// (deposits positive, withdrawals negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
}

/// Extracts the dated, signed external-flow series from a ledger,
/// ordered by date. Internal entries never appear in it.
pub fn external_cash_flows(
    transactions: &[Transaction],
    conventions: &SignConventions,
) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = transactions
        .iter()
        .filter(|t| is_external_flow(t.transaction_type))
        .map(|t| CashFlow {
            date: t.date,
            amount: conventions.signed_amount(t),
        })
        .collect();
    flows.sort_by_key(|f| f.date);
    flows
}
