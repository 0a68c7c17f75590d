use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use ledger_engine::models::{AccountKind, Customer, IdentificationKind};
use ledger_engine::in_memory_ledger;

/// Small end-to-end demo against the in-memory stores: register a
/// customer, open two accounts, move money, print the statements.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (ledger, customers) = in_memory_ledger();

    let customer = customers.register(Customer::register(
        IdentificationKind::NationalId,
        "10203040",
        "Ada",
        "Lovelace",
        "ada@example.com",
        NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
    )?)?;
    let customer_id = customer.id.expect("id assigned on register");

    let savings = ledger.lifecycle().open_account(
        AccountKind::Savings,
        customer_id,
        Some(Decimal::new(100_000, 2)),
        false,
    )?;
    let checking =
        ledger
            .lifecycle()
            .open_account(AccountKind::Checking, customer_id, None, true)?;

    let savings_id = savings.id.expect("id assigned on open");
    let checking_id = checking.id.expect("id assigned on open");

    ledger.deposit(checking_id, Decimal::new(25_000, 2), Some("Payroll"))?;
    ledger.transfer(
        savings_id,
        checking_id,
        Decimal::new(30_000, 2),
        Some("Rent share"),
    )?;
    ledger.withdraw(checking_id, Decimal::new(12_050, 2), None)?;

    for id in [savings_id, checking_id] {
        let statement = ledger.statement(id)?;
        println!(
            "{} ({:?}, {:?}) balance {}",
            statement.account.number,
            statement.account.kind,
            statement.account.status,
            statement.account.balance
        );
        for tx in statement.history {
            println!(
                "  {:>10} {:?} {}  ({} -> {})",
                tx.signed_amount().to_string(),
                tx.kind,
                tx.description.as_deref().unwrap_or(""),
                tx.balance_before,
                tx.balance_after
            );
        }
    }

    Ok(())
}
