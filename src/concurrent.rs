//! Thread-safe wrapper serializing mutations per account.
//!
//! Two concurrent operations against the same account must not both read
//! the pre-mutation balance and commit independently computed results, so
//! every mutating call holds that account's async mutex for its whole
//! load-validate-persist span. Operations on different accounts proceed in
//! parallel. A transfer locks both accounts before touching either, always
//! in ascending id order, so two crossed transfers cannot deadlock.
//!
//! Reads go straight through: a snapshot is a snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use crate::error::Result;
use crate::ledger::LedgerService;
use crate::models::{Account, AccountId, Transaction};

type AccountLock = Arc<tokio::sync::Mutex<()>>;

pub struct ConcurrentLedger {
    ledger: Arc<LedgerService>,
    locks: Arc<Mutex<HashMap<AccountId, AccountLock>>>,
}

impl ConcurrentLedger {
    pub fn new(ledger: LedgerService) -> Self {
        Self {
            ledger: Arc::new(ledger),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cheap handle to the same ledger and lock table, for sharing across
    /// tasks.
    pub fn clone_handle(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            locks: Arc::clone(&self.locks),
        }
    }

    /// The underlying service, for read-only queries and account
    /// lifecycle calls that touch no balance.
    pub fn ledger(&self) -> &LedgerService {
        &self.ledger
    }

    fn lock_for(&self, id: AccountId) -> AccountLock {
        let mut locks = self.locks.lock().expect("lock table poisoned");
        Arc::clone(locks.entry(id).or_default())
    }

    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction> {
        let lock = self.lock_for(account_id);
        let _guard = lock.lock().await;
        self.ledger.deposit(account_id, amount, description)
    }

    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction> {
        let lock = self.lock_for(account_id);
        let _guard = lock.lock().await;
        self.ledger.withdraw(account_id, amount, description)
    }

    pub async fn transfer(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<(Transaction, Transaction)> {
        // Equal ids fail validation inside the service; locking the same
        // mutex twice here would deadlock instead.
        if source_id == destination_id {
            return self
                .ledger
                .transfer(source_id, destination_id, amount, description);
        }

        let (first, second) = if source_id < destination_id {
            (source_id, destination_id)
        } else {
            (destination_id, source_id)
        };
        let first_lock = self.lock_for(first);
        let second_lock = self.lock_for(second);
        let _first_guard = first_lock.lock().await;
        let _second_guard = second_lock.lock().await;

        self.ledger
            .transfer(source_id, destination_id, amount, description)
    }

    /// Administrative balance override, serialized like any other mutation.
    pub async fn set_balance(&self, account_id: AccountId, balance: Decimal) -> Result<Account> {
        let lock = self.lock_for(account_id);
        let _guard = lock.lock().await;
        self.ledger.lifecycle().set_balance(account_id, balance)
    }

    pub async fn cancel_account(&self, account_id: AccountId) -> Result<Account> {
        let lock = self.lock_for(account_id);
        let _guard = lock.lock().await;
        self.ledger.cancel_account(account_id)
    }

    pub async fn delete_account(&self, account_id: AccountId) -> Result<()> {
        let lock = self.lock_for(account_id);
        let _guard = lock.lock().await;
        self.ledger.delete_account(account_id)
    }
}
