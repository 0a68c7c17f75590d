//! Storage interfaces the core consumes, plus in-memory implementations.
//!
//! The traits are the persistence boundary: a production deployment would
//! back them with a relational store, while the in-memory versions here
//! serve tests, demos, and the concurrency wrapper. Stores assign ids on
//! first insert and otherwise treat records as opaque values.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::{LedgerError, Result};
use crate::models::{Account, AccountId, Customer, CustomerId, Transaction, TransactionId};

/// Read-only view of the customer directory, consumed by account opening.
pub trait CustomerLookup: Send + Sync {
    fn get(&self, id: CustomerId) -> Result<Option<Customer>>;

    fn exists(&self, id: CustomerId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

/// Durable keyed storage of accounts.
pub trait AccountStore: Send + Sync {
    fn get_by_id(&self, id: AccountId) -> Result<Option<Account>>;
    fn get_by_number(&self, number: &str) -> Result<Option<Account>>;
    fn exists_by_number(&self, number: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Account>>;
    fn list_by_owner(&self, owner_id: CustomerId) -> Result<Vec<Account>>;
    /// Insert or replace. Assigns an id on first insert and returns the
    /// stored value.
    fn upsert(&self, account: Account) -> Result<Account>;
    fn delete(&self, id: AccountId) -> Result<()>;
}

/// Durable append/lookup storage of transaction records.
pub trait TransactionStore: Send + Sync {
    fn get_by_id(&self, id: TransactionId) -> Result<Option<Transaction>>;
    fn list_by_source_account(&self, account_id: AccountId) -> Result<Vec<Transaction>>;
    fn list_all(&self) -> Result<Vec<Transaction>>;
    /// Append a record, assigning its id.
    fn append(&self, transaction: Transaction) -> Result<Transaction>;
    fn delete_by_id(&self, id: TransactionId) -> Result<()>;
    fn delete_all_by_source_account(&self, account_id: AccountId) -> Result<usize>;
}

/// In-memory account store.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    next_id: AtomicU64,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl AccountStore for MemoryAccountStore {
    fn get_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let accounts = self.accounts.read().expect("account map lock poisoned");
        Ok(accounts.get(&id).cloned())
    }

    fn get_by_number(&self, number: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().expect("account map lock poisoned");
        Ok(accounts.values().find(|a| a.number == number).cloned())
    }

    fn exists_by_number(&self, number: &str) -> Result<bool> {
        Ok(self.get_by_number(number)?.is_some())
    }

    fn list(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().expect("account map lock poisoned");
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }

    fn list_by_owner(&self, owner_id: CustomerId) -> Result<Vec<Account>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|a| a.owner_id == owner_id)
            .collect())
    }

    fn upsert(&self, mut account: Account) -> Result<Account> {
        let id = match account.id {
            Some(id) => id,
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                account.id = Some(id);
                id
            }
        };
        let mut accounts = self.accounts.write().expect("account map lock poisoned");
        accounts.insert(id, account.clone());
        Ok(account)
    }

    fn delete(&self, id: AccountId) -> Result<()> {
        let mut accounts = self.accounts.write().expect("account map lock poisoned");
        accounts
            .remove(&id)
            .map(|_| ())
            .ok_or(LedgerError::AccountNotFound(id))
    }
}

/// In-memory transaction store.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
    next_id: AtomicU64,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn get_by_id(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let transactions = self
            .transactions
            .read()
            .expect("transaction map lock poisoned");
        Ok(transactions.get(&id).cloned())
    }

    fn list_by_source_account(&self, account_id: AccountId) -> Result<Vec<Transaction>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|t| t.source_account == account_id)
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self
            .transactions
            .read()
            .expect("transaction map lock poisoned");
        let mut all: Vec<Transaction> = transactions.values().cloned().collect();
        all.sort_by_key(|t| t.id);
        Ok(all)
    }

    fn append(&self, mut transaction: Transaction) -> Result<Transaction> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        transaction.id = Some(id);
        let mut transactions = self
            .transactions
            .write()
            .expect("transaction map lock poisoned");
        transactions.insert(id, transaction.clone());
        Ok(transaction)
    }

    fn delete_by_id(&self, id: TransactionId) -> Result<()> {
        let mut transactions = self
            .transactions
            .write()
            .expect("transaction map lock poisoned");
        transactions
            .remove(&id)
            .map(|_| ())
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    fn delete_all_by_source_account(&self, account_id: AccountId) -> Result<usize> {
        let mut transactions = self
            .transactions
            .write()
            .expect("transaction map lock poisoned");
        let before = transactions.len();
        transactions.retain(|_, t| t.source_account != account_id);
        Ok(before - transactions.len())
    }
}

/// In-memory customer directory. Registration enforces the uniqueness of
/// identification numbers; the per-field validation lives on
/// [`Customer::register`].
#[derive(Debug, Default)]
pub struct MemoryCustomerDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    next_id: AtomicU64,
}

impl MemoryCustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Persist a new customer, assigning its id.
    pub fn register(&self, mut customer: Customer) -> Result<Customer> {
        let mut customers = self.customers.write().expect("customer map lock poisoned");
        if customers
            .values()
            .any(|c| c.identification_number == customer.identification_number)
        {
            return Err(LedgerError::InvalidArgument(format!(
                "a customer with identification number {} already exists",
                customer.identification_number
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        customer.id = Some(id);
        customers.insert(id, customer.clone());
        Ok(customer)
    }

    pub fn list(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().expect("customer map lock poisoned");
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }
}

impl CustomerLookup for MemoryCustomerDirectory {
    fn get(&self, id: CustomerId) -> Result<Option<Customer>> {
        let customers = self.customers.read().expect("customer map lock poisoned");
        Ok(customers.get(&id).cloned())
    }
}
