//! Statement entry primitives.
//!
//! A `Statement` is one immutable record of a single deposit, withdrawal or
//! transfer leg. Entries are append-only: once persisted they are never
//! updated or deleted, and a user's balance is always the fold of their
//! entries.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Deposit,
    Withdraw,
    TransferIn,
    TransferOut,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
        }
    }

    /// Sign of this kind in the balance fold: credits count positive,
    /// debits negative. Directionality lives here, never in the amount.
    pub fn sign(self) -> i64 {
        match self {
            Self::Deposit | Self::TransferIn => 1,
            Self::Withdraw | Self::TransferOut => -1,
        }
    }
}

impl TryFrom<&str> for StatementKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "transfer_in" => Ok(Self::TransferIn),
            "transfer_out" => Ok(Self::TransferOut),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid statement kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: String,
    pub kind: StatementKind,
    pub amount: Amount,
    pub description: String,
    pub sender_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Statement {
    pub fn new(
        user_id: String,
        kind: StatementKind,
        amount: Amount,
        description: String,
        sender_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(LedgerError::InvalidDescription(
                "description must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            description,
            sender_id,
            created_at,
        })
    }

    /// Contribution of this entry to the owner's balance.
    pub fn signed_amount(&self) -> Amount {
        Amount::new(self.kind.sign() * self.amount.cents())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "statements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub description: String,
    pub sender_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Statement> for ActiveModel {
    fn from(entry: &Statement) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            user_id: ActiveValue::Set(entry.user_id.clone()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(entry.amount.cents()),
            description: ActiveValue::Set(entry.description.clone()),
            sender_id: ActiveValue::Set(entry.sender_id.clone()),
            created_at: ActiveValue::Set(entry.created_at),
        }
    }
}

impl TryFrom<Model> for Statement {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("statement not exists".to_string()))?,
            user_id: model.user_id,
            kind: StatementKind::try_from(model.kind.as_str())?,
            amount: Amount::new(model.amount_minor),
            description: model.description,
            sender_id: model.sender_id,
            created_at: model.created_at,
        })
    }
}
