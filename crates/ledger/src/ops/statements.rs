//! Write operations: deposit, withdraw, transfer.
//!
//! Every entry in the statements table is created here and nowhere else.
//! Withdrawals and transfers serialize the balance-check-then-append
//! sequence per user: the keyed lock closes the race where two concurrent
//! withdrawals both pass the check against a stale balance, and the
//! surrounding database transaction guarantees that a storage fault leaves
//! no partial entry behind.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, TransactionTrait};

use crate::{
    Amount, DepositCmd, LedgerError, ResultLedger, Statement, StatementKind, TransferCmd,
    WithdrawCmd, statements,
};

use super::{Ledger, normalize_description, queries::fold_balance, with_tx};

impl Ledger {
    /// Record a deposit.
    ///
    /// Deposits cannot violate the non-negative balance invariant, so no
    /// per-user lock is taken; the insert's own atomicity is enough.
    pub async fn deposit(&self, cmd: DepositCmd) -> ResultLedger<Statement> {
        let description = normalize_description(&cmd.description)?;
        let entry = Statement::new(
            cmd.user_id,
            StatementKind::Deposit,
            cmd.amount,
            description,
            None,
            Utc::now(),
        )?;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &entry.user_id).await?;
            statements::ActiveModel::from(&entry).insert(&db_tx).await?;
            Ok(entry)
        })
    }

    /// Record a withdrawal.
    ///
    /// The current balance is folded from the user's entries inside the same
    /// database transaction that appends the new entry, and the whole unit
    /// runs under the user's lock. A rejected withdrawal leaves no trace.
    pub async fn withdraw(&self, cmd: WithdrawCmd) -> ResultLedger<Statement> {
        let description = normalize_description(&cmd.description)?;
        let entry = Statement::new(
            cmd.user_id,
            StatementKind::Withdraw,
            cmd.amount,
            description,
            None,
            Utc::now(),
        )?;

        let lock = self.user_lock(&entry.user_id);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &entry.user_id).await?;
            self.check_funds(&db_tx, &entry.user_id, entry.amount)
                .await?;
            statements::ActiveModel::from(&entry).insert(&db_tx).await?;
            Ok(entry)
        })
    }

    /// Move funds between two users.
    ///
    /// On success exactly two entries become visible at once: a
    /// `transfer_out` for the sender and a `transfer_in` for the recipient,
    /// each carrying the counterpart in `sender_id`. Only the sender's lock
    /// is taken; an incoming transfer can only grow the recipient's balance.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultLedger<(Statement, Statement)> {
        if cmd.sender_id == cmd.recipient_id {
            return Err(LedgerError::InvalidAmount(
                "sender and recipient must differ".to_string(),
            ));
        }
        let description = normalize_description(&cmd.description)?;
        let now = Utc::now();
        let outgoing = Statement::new(
            cmd.sender_id.clone(),
            StatementKind::TransferOut,
            cmd.amount,
            description.clone(),
            Some(cmd.recipient_id.clone()),
            now,
        )?;
        let incoming = Statement::new(
            cmd.recipient_id,
            StatementKind::TransferIn,
            cmd.amount,
            description,
            Some(cmd.sender_id),
            now,
        )?;

        let lock = self.user_lock(&outgoing.user_id);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &outgoing.user_id).await?;
            self.require_user_exists(&db_tx, &incoming.user_id).await?;
            self.check_funds(&db_tx, &outgoing.user_id, outgoing.amount)
                .await?;
            statements::ActiveModel::from(&outgoing)
                .insert(&db_tx)
                .await?;
            statements::ActiveModel::from(&incoming)
                .insert(&db_tx)
                .await?;
            Ok((outgoing, incoming))
        })
    }

    async fn check_funds(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        amount: Amount,
    ) -> ResultLedger<()> {
        let balance = fold_balance(db_tx, user_id).await?;
        if balance < amount {
            return Err(LedgerError::InsufficientFunds(format!(
                "balance is {balance}, requested {amount}"
            )));
        }
        Ok(())
    }
}
