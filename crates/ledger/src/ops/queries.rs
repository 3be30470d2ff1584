//! Read-only views, scoped to one user.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    Statement as SqlStatement,
};
use uuid::Uuid;

use crate::{Amount, LedgerError, ResultLedger, Statement, statements};

use super::Ledger;

/// Folds a user's entries into their balance with one SQL aggregation.
///
/// Generic over the connection so the withdraw path can run it inside its
/// own transaction and read the same state it is about to append to.
pub(super) async fn fold_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> ResultLedger<Amount> {
    let backend = conn.get_database_backend();
    let stmt = SqlStatement::from_sql_and_values(
        backend,
        "SELECT COALESCE(SUM(CASE WHEN kind IN ('deposit', 'transfer_in') \
         THEN amount_minor ELSE -amount_minor END), 0) AS balance \
         FROM statements \
         WHERE user_id = ?",
        vec![user_id.into()],
    );
    let row = conn.query_one(stmt).await?;
    let cents: i64 = row.and_then(|r| r.try_get("", "balance").ok()).unwrap_or(0);
    Ok(Amount::new(cents))
}

impl Ledger {
    /// Current balance of a user. `0` for a user with no entries.
    pub async fn balance_of(&self, user_id: &str) -> ResultLedger<Amount> {
        fold_balance(self.database(), user_id).await
    }

    /// All entries of a user, ordered by creation time ascending (ties
    /// broken by id). Empty for a user with none.
    pub async fn list_statements(&self, user_id: &str) -> ResultLedger<Vec<Statement>> {
        let models = statements::Entity::find()
            .filter(statements::Column::UserId.eq(user_id))
            .order_by_asc(statements::Column::CreatedAt)
            .order_by_asc(statements::Column::Id)
            .all(self.database())
            .await?;

        models.into_iter().map(Statement::try_from).collect()
    }

    /// Entry list plus balance in one consistent snapshot.
    ///
    /// The balance is folded from the fetched list itself, so an entry
    /// landing between two reads can never show up in one view and not the
    /// other.
    pub async fn statement_with_balance(
        &self,
        user_id: &str,
    ) -> ResultLedger<(Vec<Statement>, Amount)> {
        let entries = self.list_statements(user_id).await?;
        let balance = entries
            .iter()
            .fold(Amount::ZERO, |acc, entry| acc + entry.signed_amount());
        Ok((entries, balance))
    }

    /// One entry by id, owned by `user_id`.
    ///
    /// An id belonging to a different user reports the same `KeyNotFound` as
    /// a genuinely missing one, so existence of other users' entries never
    /// leaks.
    pub async fn statement_operation(
        &self,
        user_id: &str,
        statement_id: Uuid,
    ) -> ResultLedger<Statement> {
        let model = statements::Entity::find_by_id(statement_id.to_string())
            .filter(statements::Column::UserId.eq(user_id))
            .one(self.database())
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("statement not exists".to_string()))?;

        Statement::try_from(model)
    }
}
