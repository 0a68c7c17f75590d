//! Account lifecycle service: opening, state transitions, balance
//! overrides, and the can-execute predicate.
//!
//! The service validates against in-memory account values and persists the
//! results through [`AccountStore`]; it never mutates an account in place.

use std::sync::Arc;

use anyhow::anyhow;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::account_number::{format_number, NumberSource};
use crate::error::{LedgerError, Result};
use crate::models::{Account, AccountId, AccountKind, AccountStatus, CustomerId, TransactionKind};
use crate::store::{AccountStore, CustomerLookup};

/// Collision-retry cap for number allocation. Generous against the
/// one-in-100-million collision odds, so exhausting it signals a store
/// fault rather than bad luck.
const MAX_NUMBER_ATTEMPTS: u32 = 1_000;

pub struct AccountLifecycle {
    customers: Arc<dyn CustomerLookup>,
    accounts: Arc<dyn AccountStore>,
    numbers: Arc<dyn NumberSource>,
}

impl AccountLifecycle {
    pub fn new(
        customers: Arc<dyn CustomerLookup>,
        accounts: Arc<dyn AccountStore>,
        numbers: Arc<dyn NumberSource>,
    ) -> Self {
        Self {
            customers,
            accounts,
            numbers,
        }
    }

    /// Open an account for an existing customer: allocate a unique number,
    /// validate the initial balance, persist ACTIVE.
    pub fn open_account(
        &self,
        kind: AccountKind,
        owner_id: CustomerId,
        initial_balance: Option<Decimal>,
        tax_exempt: bool,
    ) -> Result<Account> {
        if !self.customers.exists(owner_id)? {
            return Err(LedgerError::CustomerNotFound(owner_id));
        }

        let number = self.allocate_number(kind)?;
        let account = Account::open(kind, number, initial_balance, tax_exempt, owner_id)?;
        let account = self.accounts.upsert(account)?;
        info!(
            account = account.id,
            number = %account.number,
            owner = owner_id,
            "opened account"
        );
        Ok(account)
    }

    /// Generate candidate numbers until one is free in the store.
    fn allocate_number(&self, kind: AccountKind) -> Result<String> {
        for attempt in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = format_number(kind, self.numbers.next_suffix());
            if !self.accounts.exists_by_number(&candidate)? {
                return Ok(candidate);
            }
            debug!(%candidate, attempt, "account number collision, retrying");
        }
        Err(LedgerError::Internal(anyhow!(
            "exhausted {MAX_NUMBER_ATTEMPTS} account number candidates"
        )))
    }

    pub fn get_account(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .get_by_id(id)?
            .ok_or(LedgerError::AccountNotFound(id))
    }

    pub fn get_account_by_number(&self, number: &str) -> Result<Account> {
        self.accounts
            .get_by_number(number)?
            .ok_or_else(|| LedgerError::AccountNumberNotFound(number.to_string()))
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.list()
    }

    pub fn list_accounts_by_owner(&self, owner_id: CustomerId) -> Result<Vec<Account>> {
        self.accounts.list_by_owner(owner_id)
    }

    /// Apply a status transition and persist the result.
    ///
    /// Cancellation must go through
    /// [`LedgerService::cancel_account`](crate::ledger::LedgerService::cancel_account)
    /// when the transaction purge is wanted; the transition itself is legal
    /// here too.
    pub fn set_status(&self, id: AccountId, status: AccountStatus) -> Result<Account> {
        let account = self.get_account(id)?;
        let updated = account.with_status(status)?;
        let updated = self.accounts.upsert(updated)?;
        info!(account = id, ?status, "account status changed");
        Ok(updated)
    }

    pub fn activate(&self, id: AccountId) -> Result<Account> {
        self.set_status(id, AccountStatus::Active)
    }

    pub fn deactivate(&self, id: AccountId) -> Result<Account> {
        self.set_status(id, AccountStatus::Inactive)
    }

    /// Administrative balance override, bypassing transaction recording.
    /// The savings non-negative rule still applies.
    pub fn set_balance(&self, id: AccountId, balance: Decimal) -> Result<Account> {
        let account = self.get_account(id)?;
        let updated = account.with_balance(balance)?;
        self.accounts.upsert(updated)
    }

    /// Whether a transaction of `kind` for `amount` may execute against
    /// the account.
    pub fn can_execute(
        &self,
        id: AccountId,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<bool> {
        Ok(self.get_account(id)?.can_execute(amount, kind))
    }
}
