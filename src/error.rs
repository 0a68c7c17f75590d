use thiserror::Error;

use crate::models::{AccountId, CustomerId, TransactionId};

/// Failures raised by the ledger core.
///
/// The not-found, invalid-argument, and invalid-state variants are the
/// client-facing taxonomy; `Internal` wraps collaborator failures opaquely
/// so storage detail never leaks to callers.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account not found: id {0}")]
    AccountNotFound(AccountId),

    #[error("account not found: number {0}")]
    AccountNumberNotFound(String),

    #[error("customer not found: id {0}")]
    CustomerNotFound(CustomerId),

    #[error("transaction not found: id {0}")]
    TransactionNotFound(TransactionId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LedgerError {
    /// True for any of the entity-not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::AccountNumberNotFound(_)
                | Self::CustomerNotFound(_)
                | Self::TransactionNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
