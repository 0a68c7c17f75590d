#![allow(dead_code)] // each test binary uses its own slice of the helpers

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledger_engine::account_number::SequenceNumberSource;
use ledger_engine::models::{Account, AccountId, AccountKind, Customer, CustomerId, IdentificationKind};
use ledger_engine::store::MemoryCustomerDirectory;
use ledger_engine::{in_memory_ledger_with_numbers, LedgerService};

/// In-memory ledger with deterministic account numbers and one registered
/// customer to own test accounts.
pub struct TestBank {
    pub ledger: LedgerService,
    pub customers: Arc<MemoryCustomerDirectory>,
    pub customer_id: CustomerId,
}

pub fn bank() -> TestBank {
    let (ledger, customers) =
        in_memory_ledger_with_numbers(Arc::new(SequenceNumberSource::default()));
    let customer = customers
        .register(make_customer("1001"))
        .expect("register test customer");
    TestBank {
        ledger,
        customers,
        customer_id: customer.id.expect("id assigned on register"),
    }
}

impl TestBank {
    pub fn open(&self, kind: AccountKind, balance: Decimal) -> Account {
        self.ledger
            .lifecycle()
            .open_account(kind, self.customer_id, Some(balance), false)
            .expect("open account")
    }

    pub fn open_savings(&self, balance: Decimal) -> AccountId {
        self.open(AccountKind::Savings, balance)
            .id
            .expect("id assigned on open")
    }

    pub fn open_checking(&self, balance: Decimal) -> AccountId {
        self.open(AccountKind::Checking, balance)
            .id
            .expect("id assigned on open")
    }

    pub fn balance(&self, id: AccountId) -> Decimal {
        self.ledger
            .lifecycle()
            .get_account(id)
            .expect("account exists")
            .balance
    }
}

/// Valid adult customer with the given identification number.
pub fn make_customer(identification: &str) -> Customer {
    Customer::register(
        IdentificationKind::NationalId,
        identification,
        "Grace",
        "Hopper",
        "grace@example.com",
        adult_birth_date(),
    )
    .expect("valid customer")
}

pub fn adult_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1985, 6, 15).expect("valid date")
}
