mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;

use common::{adult_birth_date, bank, make_customer};
use ledger_engine::account_number::{is_valid_number, SequenceNumberSource};
use ledger_engine::models::{AccountKind, AccountStatus, Customer, IdentificationKind, TransactionKind};
use ledger_engine::store::{
    AccountStore, CustomerLookup, MemoryAccountStore, MemoryCustomerDirectory,
};
use ledger_engine::{AccountLifecycle, LedgerError};

#[test]
fn open_account_starts_active_with_prefixed_number() {
    let bank = bank();

    let savings = bank.open(AccountKind::Savings, dec!(100));
    assert_eq!(savings.status, AccountStatus::Active);
    assert_eq!(savings.balance, dec!(100));
    assert!(is_valid_number(&savings.number, AccountKind::Savings));
    assert!(savings.number.starts_with("53"));

    let checking = bank.open(AccountKind::Checking, dec!(0));
    assert!(is_valid_number(&checking.number, AccountKind::Checking));
    assert!(checking.number.starts_with("33"));
}

#[test]
fn open_account_defaults_balance_to_zero() {
    let bank = bank();
    let account = bank
        .ledger
        .lifecycle()
        .open_account(AccountKind::Savings, bank.customer_id, None, true)
        .unwrap();
    assert_eq!(account.balance, dec!(0));
    assert!(account.tax_exempt);
}

#[test]
fn sequential_opens_get_pairwise_distinct_numbers() {
    let bank = bank();
    let mut numbers = Vec::new();
    for _ in 0..20 {
        numbers.push(bank.open(AccountKind::Savings, dec!(0)).number);
    }
    for (i, a) in numbers.iter().enumerate() {
        assert!(a.starts_with("53"));
        for b in &numbers[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn number_allocation_retries_past_collisions() {
    // Two lifecycles over one account store, both starting their suffix
    // sequences at zero: the second open collides with the first account's
    // number and must move on to the next candidate.
    let customers = Arc::new(MemoryCustomerDirectory::new());
    let customer = customers.register(make_customer("2002")).unwrap();
    let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());

    let lookup: Arc<dyn CustomerLookup> = customers.clone();
    let first = AccountLifecycle::new(
        Arc::clone(&lookup),
        Arc::clone(&accounts),
        Arc::new(SequenceNumberSource::starting_at(0)),
    );
    let second = AccountLifecycle::new(
        lookup,
        Arc::clone(&accounts),
        Arc::new(SequenceNumberSource::starting_at(0)),
    );

    let owner = customer.id.unwrap();
    let a = first
        .open_account(AccountKind::Savings, owner, None, false)
        .unwrap();
    let b = second
        .open_account(AccountKind::Savings, owner, None, false)
        .unwrap();

    assert_eq!(a.number, "5300000000");
    assert_eq!(b.number, "5300000001");
}

#[test]
fn open_account_for_unknown_customer_fails() {
    let bank = bank();
    let err = bank
        .ledger
        .lifecycle()
        .open_account(AccountKind::Savings, 999, None, false)
        .unwrap_err();
    assert!(matches!(err, LedgerError::CustomerNotFound(999)));
}

#[test]
fn savings_account_rejects_negative_initial_balance() {
    let bank = bank();
    let err = bank
        .ledger
        .lifecycle()
        .open_account(AccountKind::Savings, bank.customer_id, Some(dec!(-1)), false)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
}

#[test]
fn checking_account_accepts_negative_balance() {
    let bank = bank();
    let account = bank.open(AccountKind::Checking, dec!(-250));
    assert_eq!(account.balance, dec!(-250));
}

#[test]
fn active_and_inactive_are_freely_interchangeable() {
    let bank = bank();
    let id = bank.open_savings(dec!(0));

    let inactive = bank.ledger.lifecycle().deactivate(id).unwrap();
    assert_eq!(inactive.status, AccountStatus::Inactive);

    let active = bank.ledger.lifecycle().activate(id).unwrap();
    assert_eq!(active.status, AccountStatus::Active);
}

#[test]
fn cancelling_a_nonzero_balance_account_fails() {
    let bank = bank();
    let id = bank.open_savings(dec!(50));

    let err = bank.ledger.cancel_account(id).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidState(_)));
    assert_eq!(bank.balance(id), dec!(50));
}

#[test]
fn cancellation_is_terminal() {
    let bank = bank();
    let id = bank.open_savings(dec!(0));

    let cancelled = bank.ledger.cancel_account(id).unwrap();
    assert_eq!(cancelled.status, AccountStatus::Cancelled);

    let err = bank.ledger.lifecycle().activate(id).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidState(_)));
    let err = bank.ledger.lifecycle().deactivate(id).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidState(_)));
}

#[test]
fn can_execute_enforces_activity_and_savings_ceiling() {
    let bank = bank();
    let savings = bank.open_savings(dec!(100));
    let checking = bank.open_checking(dec!(100));
    let lifecycle = bank.ledger.lifecycle();

    assert!(lifecycle
        .can_execute(savings, dec!(100), TransactionKind::Withdrawal)
        .unwrap());
    assert!(!lifecycle
        .can_execute(savings, dec!(101), TransactionKind::Withdrawal)
        .unwrap());
    assert!(!lifecycle
        .can_execute(savings, dec!(101), TransactionKind::Transfer)
        .unwrap());
    // Checking has no ceiling.
    assert!(lifecycle
        .can_execute(checking, dec!(10_000), TransactionKind::Withdrawal)
        .unwrap());
    // Deposits only need an active account.
    assert!(lifecycle
        .can_execute(savings, dec!(10_000), TransactionKind::Deposit)
        .unwrap());

    lifecycle.deactivate(savings).unwrap();
    assert!(!lifecycle
        .can_execute(savings, dec!(1), TransactionKind::Deposit)
        .unwrap());
}

#[test]
fn admin_set_balance_still_validates_kind() {
    let bank = bank();
    let savings = bank.open_savings(dec!(10));
    let checking = bank.open_checking(dec!(10));
    let lifecycle = bank.ledger.lifecycle();

    let err = lifecycle.set_balance(savings, dec!(-5)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    assert_eq!(bank.balance(savings), dec!(10));

    let updated = lifecycle.set_balance(checking, dec!(-5)).unwrap();
    assert_eq!(updated.balance, dec!(-5));
}

#[test]
fn lookup_by_number_and_owner_listing() {
    let bank = bank();
    let account = bank.open(AccountKind::Savings, dec!(0));
    let lifecycle = bank.ledger.lifecycle();

    let found = lifecycle.get_account_by_number(&account.number).unwrap();
    assert_eq!(found.id, account.id);

    let err = lifecycle.get_account_by_number("5399999999").unwrap_err();
    assert!(err.is_not_found());

    let owned = lifecycle.list_accounts_by_owner(bank.customer_id).unwrap();
    assert_eq!(owned.len(), 1);
    assert!(lifecycle.list_accounts_by_owner(999).unwrap().is_empty());
}

#[test]
fn customer_registration_validates_and_deduplicates() {
    let directory = MemoryCustomerDirectory::new();
    directory.register(make_customer("3003")).unwrap();

    let err = directory.register(make_customer("3003")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    let err = Customer::register(
        IdentificationKind::Passport,
        "4004",
        "A",
        "Turing",
        "alan@example.com",
        adult_birth_date(),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    let err = Customer::register(
        IdentificationKind::Passport,
        "4004",
        "Alan",
        "Turing",
        "not-an-email",
        adult_birth_date(),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    let underage = chrono::Utc::now().date_naive() - chrono::Days::new(365 * 10);
    let err = Customer::register(
        IdentificationKind::Passport,
        "4004",
        "Alan",
        "Turing",
        "alan@example.com",
        underage,
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
}
