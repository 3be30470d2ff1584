//! The module contains the error the ledger can throw.
//!
//! The errors are:
//!
//! - [`InsufficientFunds`] thrown when a withdrawal or transfer would
//!   overdraw the account.
//! - [`KeyNotFound`] thrown when an item is not found.
//!
//!  [`InsufficientFunds`]: LedgerError::InsufficientFunds
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid description: {0}")]
    InvalidDescription(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDescription(a), Self::InvalidDescription(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
