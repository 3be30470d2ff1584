use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use sea_orm::DatabaseConnection;

use crate::{LedgerError, ResultLedger};

mod queries;
mod statements;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger: the only writer of statement entries.
///
/// Holds the database handle plus a per-user lock table used to serialize
/// the balance-check-then-append sequence of withdrawals and transfers.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Lock handle for one user. Entries are created on demand and never
    /// removed; the outer mutex guards only the map lookup and is released
    /// before any `.await`.
    pub(crate) fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.user_locks.lock() {
            Ok(locks) => locks,
            // The map stays usable even if a holder panicked mid-lookup.
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.entry(user_id.to_string()).or_default().clone()
    }
}

pub(crate) fn normalize_description(value: &str) -> ResultLedger<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidDescription(
            "description must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_required_field(value: &str, label: &str) -> ResultLedger<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidDescription(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
            user_locks: Mutex::new(HashMap::new()),
        }
    }
}
