pub mod account;
pub mod customer;
pub mod transaction;

pub use account::{Account, AccountId, AccountKind, AccountStatus, CustomerId};
pub use customer::{Customer, IdentificationKind};
pub use transaction::{Transaction, TransactionId, TransactionKind};
