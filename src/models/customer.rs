use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::CustomerId;

const ADULT_AGE: i32 = 18;

/// Kind of identification document a customer registers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationKind {
    NationalId,
    ForeignerId,
    IdentityCard,
    Passport,
    TaxId,
}

/// A registered customer. The core only reads customers through
/// [`CustomerLookup`](crate::store::CustomerLookup); registration and its
/// validation live here so the directory implementation stays thin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub identification_kind: IdentificationKind,
    pub identification_number: String,
    pub given_names: String,
    pub surname: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Build a validated, not-yet-persisted customer.
    pub fn register(
        identification_kind: IdentificationKind,
        identification_number: &str,
        given_names: &str,
        surname: &str,
        email: &str,
        birth_date: NaiveDate,
    ) -> Result<Self> {
        let identification_number = identification_number.trim();
        if identification_number.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "the identification number is required".into(),
            ));
        }

        let given_names = given_names.trim();
        if given_names.chars().count() < 2 {
            return Err(LedgerError::InvalidArgument(
                "given names must be at least 2 characters".into(),
            ));
        }

        let surname = surname.trim();
        if surname.chars().count() < 2 {
            return Err(LedgerError::InvalidArgument(
                "the surname must be at least 2 characters".into(),
            ));
        }

        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(LedgerError::InvalidArgument(
                "the email address is not valid".into(),
            ));
        }

        let today = Utc::now().date_naive();
        if birth_date >= today {
            return Err(LedgerError::InvalidArgument(
                "the birth date must be in the past".into(),
            ));
        }
        if age_on(birth_date, today) < ADULT_AGE {
            return Err(LedgerError::InvalidArgument(
                "the customer must be an adult".into(),
            ));
        }

        Ok(Self {
            id: None,
            identification_kind,
            identification_number: identification_number.to_string(),
            given_names: given_names.to_string(),
            surname: surname.to_string(),
            email,
            birth_date,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn age(&self) -> i32 {
        age_on(self.birth_date, Utc::now().date_naive())
    }

    pub fn is_adult(&self) -> bool {
        self.age() >= ADULT_AGE
    }
}

fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

// Structural check only; deliverability is the mail system's problem.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}
