use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::TransactionKind;

/// Identifier assigned by the account store on first insert.
pub type AccountId = u64;
/// Identifier of a customer in the customer directory.
pub type CustomerId = u64;

/// Kind of financial account. Immutable after opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Checking,
}

impl AccountKind {
    /// Fixed two-digit code account numbers of this kind start with.
    pub fn number_prefix(self) -> &'static str {
        match self {
            AccountKind::Savings => "53",
            AccountKind::Checking => "33",
        }
    }
}

/// Account status. ACTIVE and INACTIVE are freely interchangeable;
/// CANCELLED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Cancelled,
}

/// An account ("product") owned by a customer.
///
/// Accounts are immutable values: every lifecycle change returns a new
/// instance, and the caller persists it explicitly. Balance and status
/// never change through direct field writes in the services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Absent until the store assigns one.
    pub id: Option<AccountId>,
    pub kind: AccountKind,
    pub number: String,
    pub status: AccountStatus,
    pub balance: Decimal,
    /// Tax-exemption flag, carried through untouched by the core.
    pub tax_exempt: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner_id: CustomerId,
}

impl Account {
    /// Build a newly opened account: ACTIVE, with the given number and an
    /// initial balance of zero when none is supplied.
    pub fn open(
        kind: AccountKind,
        number: String,
        initial_balance: Option<Decimal>,
        tax_exempt: bool,
        owner_id: CustomerId,
    ) -> Result<Self> {
        let balance = validate_balance(kind, initial_balance.unwrap_or(Decimal::ZERO))?;
        Ok(Self {
            id: None,
            kind,
            number,
            status: AccountStatus::Active,
            balance,
            tax_exempt,
            created_at: Utc::now(),
            updated_at: None,
            owner_id,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Whether the account may be cancelled or deleted: balance exactly zero.
    pub fn can_cancel(&self) -> bool {
        self.balance.is_zero()
    }

    /// Whether a transaction of `kind` for `amount` may execute against
    /// this account.
    ///
    /// The account must be ACTIVE. Debits (withdrawal, transfer-out) on a
    /// savings account must not exceed the balance; checking accounts may
    /// overdraft without a floor. Deposits are always allowed while active.
    pub fn can_execute(&self, amount: Decimal, kind: TransactionKind) -> bool {
        if !self.is_active() {
            return false;
        }

        if matches!(kind, TransactionKind::Withdrawal | TransactionKind::Transfer)
            && self.kind == AccountKind::Savings
        {
            return self.balance >= amount;
        }

        true
    }

    /// Return a copy with the new status.
    ///
    /// Cancelling requires a zero balance; nothing transitions back out of
    /// CANCELLED.
    pub fn with_status(&self, status: AccountStatus) -> Result<Self> {
        if self.status == AccountStatus::Cancelled && status != AccountStatus::Cancelled {
            return Err(LedgerError::InvalidState(
                "a cancelled account cannot change status".into(),
            ));
        }
        if status == AccountStatus::Cancelled && !self.can_cancel() {
            return Err(LedgerError::InvalidState(
                "only accounts with zero balance can be cancelled".into(),
            ));
        }

        Ok(Self {
            status,
            updated_at: Some(Utc::now()),
            ..self.clone()
        })
    }

    /// Return a copy with the new balance, re-validated against the
    /// savings non-negative rule. This is the only path balances change by.
    pub fn with_balance(&self, balance: Decimal) -> Result<Self> {
        let balance = validate_balance(self.kind, balance)?;
        Ok(Self {
            balance,
            updated_at: Some(Utc::now()),
            ..self.clone()
        })
    }
}

fn validate_balance(kind: AccountKind, balance: Decimal) -> Result<Decimal> {
    if kind == AccountKind::Savings && balance < Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(
            "a savings account cannot hold a negative balance".into(),
        ));
    }
    Ok(balance)
}
