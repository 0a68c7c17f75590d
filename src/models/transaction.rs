use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::AccountId;

/// Identifier assigned by the transaction store on append.
pub type TransactionId = u64;

/// Kind of ledger movement.
///
/// A transfer's credit leg is recorded as a separate `Deposit` on the
/// destination account, so `Transfer` only ever appears on the debit side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

/// An immutable ledger record explaining one balance change on
/// `source_account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Absent until the store assigns one.
    pub id: Option<TransactionId>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    /// The account whose balance this record explains.
    pub source_account: AccountId,
    /// Counterparty account. Required for transfers; on a transfer's
    /// credit leg it carries the originating account as an informational
    /// back-reference.
    pub destination_account: Option<AccountId>,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

impl Transaction {
    /// Build a validated record with balance snapshots taken by the caller
    /// at the moment the movement was applied.
    pub fn record(
        kind: TransactionKind,
        amount: Decimal,
        source_account: AccountId,
        destination_account: Option<AccountId>,
        description: impl Into<String>,
        balance_before: Decimal,
        balance_after: Decimal,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "transaction amount must be greater than zero".into(),
            ));
        }
        if kind == TransactionKind::Transfer && destination_account.is_none() {
            return Err(LedgerError::InvalidArgument(
                "a transfer requires a destination account".into(),
            ));
        }
        if destination_account == Some(source_account) {
            return Err(LedgerError::InvalidArgument(
                "source and destination accounts cannot be the same".into(),
            ));
        }

        Ok(Self {
            id: None,
            kind,
            amount,
            description: Some(description.into()),
            occurred_at: Utc::now(),
            source_account,
            destination_account,
            balance_before,
            balance_after,
        })
    }

    /// True for movements that reduce the source account's balance.
    pub fn is_debit(&self) -> bool {
        matches!(
            self.kind,
            TransactionKind::Withdrawal | TransactionKind::Transfer
        )
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Deposit
    }

    /// Amount negated for debits, useful when summing a history.
    pub fn signed_amount(&self) -> Decimal {
        if self.is_debit() {
            -self.amount
        } else {
            self.amount
        }
    }
}
