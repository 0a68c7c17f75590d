//! Account number generation: `<kind prefix><8-digit suffix>`.
//!
//! Randomness is injected through [`NumberSource`] so tests can drive
//! allocation deterministically instead of sharing a process-wide RNG.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

use crate::models::AccountKind;

/// Digits in the random part of an account number.
pub const SUFFIX_LEN: usize = 8;

const SUFFIX_SPACE: u32 = 100_000_000;

/// Source of candidate account-number suffixes.
pub trait NumberSource: Send + Sync {
    /// Next candidate suffix, in `0..100_000_000`.
    fn next_suffix(&self) -> u32;
}

/// Thread-local RNG backed source used in production.
#[derive(Debug, Default)]
pub struct RandomNumberSource;

impl NumberSource for RandomNumberSource {
    fn next_suffix(&self) -> u32 {
        rand::thread_rng().gen_range(0..SUFFIX_SPACE)
    }
}

/// Deterministic source handing out consecutive suffixes. For tests and
/// demos.
#[derive(Debug, Default)]
pub struct SequenceNumberSource {
    next: AtomicU32,
}

impl SequenceNumberSource {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl NumberSource for SequenceNumberSource {
    fn next_suffix(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed) % SUFFIX_SPACE
    }
}

/// Render a candidate number for the given account kind.
pub fn format_number(kind: AccountKind, suffix: u32) -> String {
    format!("{}{:08}", kind.number_prefix(), suffix % SUFFIX_SPACE)
}

/// Whether `number` is well-formed for `kind`: the kind's prefix followed
/// by exactly eight digits.
pub fn is_valid_number(number: &str, kind: AccountKind) -> bool {
    let prefix = kind.number_prefix();
    number.len() == prefix.len() + SUFFIX_LEN
        && number.starts_with(prefix)
        && number[prefix.len()..].bytes().all(|b| b.is_ascii_digit())
}
