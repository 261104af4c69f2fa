//! The module contains the errors the ledger can throw.
//!
//! The taxonomy mirrors how failures surface to the API layer:
//!
//! - [`Validation`] for malformed input (non-positive amount, short
//!   description, bad date range).
//! - [`NotFound`] for missing clients, projects or contracts.
//! - [`BalanceExceeded`] for a movement that would break a ceiling.
//! - [`EmptyRange`] for a range query that legitimately matched nothing.
//! - [`Store`] for persistence failures; a failed transaction is rolled
//!   back, nothing is partially written.
//!
//! [`Validation`]: LedgerError::Validation
//! [`NotFound`]: LedgerError::NotFound
//! [`BalanceExceeded`]: LedgerError::BalanceExceeded
//! [`EmptyRange`]: LedgerError::EmptyRange
//! [`Store`]: LedgerError::Store
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid data: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Balance exceeded: {0}")]
    BalanceExceeded(String),
    #[error("Empty range: {0}")]
    EmptyRange(String),
    #[error("\"{0}\" already present!")]
    AlreadyExists(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Store(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::BalanceExceeded(a), Self::BalanceExceeded(b)) => a == b,
            (Self::EmptyRange(a), Self::EmptyRange(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
