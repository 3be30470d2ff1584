use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod amount;

pub use amount::flexible_amount;

pub mod user {
    use super::*;

    /// Request body for registering a user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    /// Public view of a user. Never carries the password column.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod session {
    use super::*;

    /// Request body for opening a session.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionNew {
        pub email: String,
        pub password: String,
    }

    /// Response body: the opaque bearer token plus the authenticated user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionCreated {
        pub token: String,
        pub user: user::UserView,
    }
}

pub mod statement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StatementKind {
        Deposit,
        Withdraw,
        TransferIn,
        TransferOut,
    }

    /// Request body for a deposit or withdrawal.
    ///
    /// `amount` is a fixed-point decimal; both `"150.00"` strings and bare
    /// JSON numbers are accepted on the way in.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementNew {
        #[serde(deserialize_with = "flexible_amount")]
        pub amount: String,
        pub description: String,
    }

    /// Request body for a transfer; the recipient id travels in the path.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        #[serde(deserialize_with = "flexible_amount")]
        pub amount: String,
        pub description: String,
    }

    /// One ledger entry as seen by clients. Amounts are decimal strings
    /// (`"150.00"`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementView {
        pub id: Uuid,
        pub user_id: String,
        #[serde(rename = "type")]
        pub kind: StatementKind,
        pub amount: String,
        pub description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sender_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Response body of the balance view: the full ordered entry list and
    /// the balance folded from that same list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub statement: Vec<StatementView>,
        pub balance: String,
    }
}
