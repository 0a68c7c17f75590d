//! Ledger operations: deposits, withdrawals, two-legged transfers,
//! statements, and the account closure cascade.
//!
//! Every money operation couples one balance change with one transaction
//! record. The record is built and validated before anything is persisted,
//! and a failed record append rolls the account back, so callers never
//! observe a mutation without its record or the reverse.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::lifecycle::AccountLifecycle;
use crate::models::{Account, AccountId, AccountStatus, Transaction, TransactionId, TransactionKind};
use crate::store::{AccountStore, TransactionStore};

/// Account snapshot plus its full transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub account: Account,
    pub history: Vec<Transaction>,
}

pub struct LedgerService {
    lifecycle: AccountLifecycle,
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl LedgerService {
    pub fn new(
        lifecycle: AccountLifecycle,
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            lifecycle,
            accounts,
            transactions,
        }
    }

    /// Account surface (opening, lookups, status changes, predicates).
    pub fn lifecycle(&self) -> &AccountLifecycle {
        &self.lifecycle
    }

    /// Credit `amount` to the account and record a DEPOSIT.
    pub fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction> {
        let account = self.lifecycle.get_account(account_id)?;
        if !account.is_active() {
            return Err(LedgerError::InvalidState(
                "deposits require an active account".into(),
            ));
        }

        let before = account.balance;
        let after = before + amount;
        let record = Transaction::record(
            TransactionKind::Deposit,
            amount,
            account_id,
            None,
            description.unwrap_or("Deposit"),
            before,
            after,
        )?;
        let updated = account.with_balance(after)?;

        let record = self.commit(&account, updated, record)?;
        info!(account = account_id, %amount, "deposit applied");
        Ok(record)
    }

    /// Debit `amount` from the account and record a WITHDRAWAL.
    ///
    /// A single InvalidState covers both an inactive account and
    /// insufficient funds, matching the predicate it delegates to.
    pub fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction> {
        let account = self.lifecycle.get_account(account_id)?;
        if !account.can_execute(amount, TransactionKind::Withdrawal) {
            return Err(LedgerError::InvalidState(
                "withdrawal rejected: insufficient funds or inactive account".into(),
            ));
        }

        let before = account.balance;
        let after = before - amount;
        let record = Transaction::record(
            TransactionKind::Withdrawal,
            amount,
            account_id,
            None,
            description.unwrap_or("Withdrawal"),
            before,
            after,
        )?;
        let updated = account.with_balance(after)?;

        let record = self.commit(&account, updated, record)?;
        info!(account = account_id, %amount, "withdrawal applied");
        Ok(record)
    }

    /// Move `amount` between two accounts, recording a TRANSFER debit on
    /// the source and a DEPOSIT credit on the destination. Returns the
    /// debit leg first.
    pub fn transfer(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(Transaction, Transaction)> {
        if source_id == destination_id {
            return Err(LedgerError::InvalidArgument(
                "source and destination accounts cannot be the same".into(),
            ));
        }

        let source = self.lifecycle.get_account(source_id)?;
        let destination = self.lifecycle.get_account(destination_id)?;

        if !source.is_active() || !destination.is_active() {
            return Err(LedgerError::InvalidState(
                "both accounts must be active for a transfer".into(),
            ));
        }
        if !source.can_execute(amount, TransactionKind::Transfer) {
            return Err(LedgerError::InvalidState(
                "insufficient funds in the source account".into(),
            ));
        }

        // Debit leg.
        let source_before = source.balance;
        let source_after = source_before - amount;
        let debit = Transaction::record(
            TransactionKind::Transfer,
            amount,
            source_id,
            Some(destination_id),
            description.unwrap_or("Transfer sent"),
            source_before,
            source_after,
        )?;
        let updated_source = source.with_balance(source_after)?;

        // Credit leg, recorded as a deposit on the destination with the
        // source carried as an informational back-reference.
        let destination_before = destination.balance;
        let destination_after = destination_before + amount;
        let credit_description = match description {
            Some(d) => format!("Transfer received: {d}"),
            None => "Transfer received".to_string(),
        };
        let credit = Transaction::record(
            TransactionKind::Deposit,
            amount,
            destination_id,
            Some(source_id),
            credit_description,
            destination_before,
            destination_after,
        )?;
        let updated_destination = destination.with_balance(destination_after)?;

        let debit = self.commit(&source, updated_source, debit)?;
        let credit = match self.commit(&destination, updated_destination, credit) {
            Ok(credit) => credit,
            Err(err) => {
                // Unwind the debit leg so money never leaves the source
                // without reaching the destination.
                warn!(
                    source = source_id,
                    destination = destination_id,
                    error = %err,
                    "credit leg failed, rolling back debit"
                );
                let _ = self.accounts.upsert(source.clone());
                if let Some(id) = debit.id {
                    let _ = self.transactions.delete_by_id(id);
                }
                return Err(err);
            }
        };

        info!(
            source = source_id,
            destination = destination_id,
            %amount,
            "transfer applied"
        );
        Ok((debit, credit))
    }

    /// Persist the mutated account, then append its record. A failed
    /// append restores the prior account state before propagating.
    fn commit(
        &self,
        original: &Account,
        updated: Account,
        record: Transaction,
    ) -> Result<Transaction> {
        self.accounts.upsert(updated)?;
        match self.transactions.append(record) {
            Ok(stored) => Ok(stored),
            Err(err) => {
                warn!(
                    account = original.id,
                    error = %err,
                    "record append failed, restoring account"
                );
                let _ = self.accounts.upsert(original.clone());
                Err(err)
            }
        }
    }

    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .get_by_id(id)?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.transactions.list_all()
    }

    /// Full history of an account, oldest record first. Transfer credits
    /// land here through their destination-side source id.
    pub fn history(&self, account_id: AccountId) -> Result<Vec<Transaction>> {
        self.lifecycle.get_account(account_id)?;
        self.transactions.list_by_source_account(account_id)
    }

    /// Current snapshot plus full history.
    pub fn statement(&self, account_id: AccountId) -> Result<Statement> {
        let account = self.lifecycle.get_account(account_id)?;
        let history = self.transactions.list_by_source_account(account_id)?;
        Ok(Statement { account, history })
    }

    /// Administrative removal of a single record. No balance
    /// re-derivation happens; prefer reversing entries in anything
    /// user-facing.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        self.get_transaction(id)?;
        self.transactions.delete_by_id(id)
    }

    /// Cancel a zero-balance account and purge its transaction history.
    /// Terminal: the account cannot be reactivated afterwards.
    pub fn cancel_account(&self, account_id: AccountId) -> Result<Account> {
        let account = self.lifecycle.get_account(account_id)?;
        if !account.can_cancel() {
            return Err(LedgerError::InvalidState(
                "only accounts with zero balance can be cancelled".into(),
            ));
        }

        let purged = self.transactions.delete_all_by_source_account(account_id)?;
        let cancelled = self.lifecycle.set_status(account_id, AccountStatus::Cancelled)?;
        info!(account = account_id, purged, "account cancelled");
        Ok(cancelled)
    }

    /// Delete a zero-balance account outright, cascading its records.
    pub fn delete_account(&self, account_id: AccountId) -> Result<()> {
        let account = self.lifecycle.get_account(account_id)?;
        if !account.can_cancel() {
            return Err(LedgerError::InvalidState(
                "an account with a non-zero balance cannot be deleted".into(),
            ));
        }

        let purged = self.transactions.delete_all_by_source_account(account_id)?;
        self.accounts.delete(account_id)?;
        info!(account = account_id, purged, "account deleted");
        Ok(())
    }
}
