pub mod account_number;
pub mod concurrent;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod models;
pub mod store;

use std::sync::Arc;

pub use concurrent::ConcurrentLedger;
pub use error::{LedgerError, Result};
pub use ledger::{LedgerService, Statement};
pub use lifecycle::AccountLifecycle;

use account_number::{NumberSource, RandomNumberSource};
use store::{
    AccountStore, MemoryAccountStore, MemoryCustomerDirectory, MemoryTransactionStore,
    TransactionStore,
};

/// Build a ledger backed by in-memory stores and random account numbers.
///
/// Returns the service along with the customer directory, which callers
/// need for registering the customers accounts are opened against.
pub fn in_memory_ledger() -> (LedgerService, Arc<MemoryCustomerDirectory>) {
    in_memory_ledger_with_numbers(Arc::new(RandomNumberSource))
}

/// Same as [`in_memory_ledger`], with an injected number source for
/// deterministic account numbers in tests.
pub fn in_memory_ledger_with_numbers(
    numbers: Arc<dyn NumberSource>,
) -> (LedgerService, Arc<MemoryCustomerDirectory>) {
    let customers = Arc::new(MemoryCustomerDirectory::new());
    let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
    let transactions: Arc<dyn TransactionStore> = Arc::new(MemoryTransactionStore::new());

    let customer_lookup: Arc<dyn store::CustomerLookup> = customers.clone();
    let lifecycle = AccountLifecycle::new(customer_lookup, Arc::clone(&accounts), numbers);
    let ledger = LedgerService::new(lifecycle, accounts, transactions);

    (ledger, customers)
}
