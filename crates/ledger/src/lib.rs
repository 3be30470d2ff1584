//! Ledger core: the append-only account ledger and its integrity rules.
//!
//! A user's balance is never stored; it is always the fold of that user's
//! immutable statement entries. The [`Ledger`] struct is the only writer of
//! entries and enforces the no-overdraft invariant by serializing the
//! balance-check-then-append sequence per user.

pub use commands::{DepositCmd, TransferCmd, WithdrawCmd};
pub use error::LedgerError;
pub use money::Amount;
pub use ops::{Ledger, LedgerBuilder};
pub use statements::{Statement, StatementKind};

mod commands;
mod error;
mod money;
mod ops;
pub mod sessions;
pub mod statements;
pub mod users;

pub type ResultLedger<T> = Result<T, LedgerError>;
