//! User and session operations.
//!
//! The ledger core trusts the `user_id` resolved by the auth layer; the
//! operations here are the narrow surface that layer is built on.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, sessions, users};

use super::{Ledger, normalize_required_field, with_tx};

impl Ledger {
    /// Register a new user. The email is the login identifier and must be
    /// unique.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ResultLedger<users::Model> {
        let name = normalize_required_field(name, "name")?;
        let email = normalize_required_field(email, "email")?;
        if password.is_empty() {
            return Err(LedgerError::InvalidDescription(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(LedgerError::ExistingKey(email));
            }

            let user = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password.to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let user = user.insert(&db_tx).await?;
            Ok(user)
        })
    }

    /// Exchange an email/password pair for a session token.
    ///
    /// Wrong email and wrong password are the same `Unauthorized` outcome.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> ResultLedger<(sessions::Model, users::Model)> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.database())
            .await?
            .ok_or(LedgerError::Unauthorized)?;
        if user.password != password {
            return Err(LedgerError::Unauthorized);
        }

        let session = sessions::ActiveModel {
            token: ActiveValue::Set(Uuid::new_v4().to_string()),
            user_id: ActiveValue::Set(user.id.clone()),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let session = session.insert(self.database()).await?;
        Ok((session, user))
    }

    /// Profile of an existing user.
    pub async fn profile(&self, user_id: &str) -> ResultLedger<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(self.database())
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultLedger<()> {
        let user = users::Entity::find_by_id(user_id).one(db).await?;
        if user.is_none() {
            return Err(LedgerError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }
}
