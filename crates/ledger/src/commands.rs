//! Command structs for ledger write operations.
//!
//! These types group parameters for deposit/withdraw/transfer, keeping call
//! sites readable and avoiding long argument lists.

use crate::Amount;

/// Record a deposit for a user.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub user_id: String,
    pub amount: Amount,
    pub description: String,
}

impl DepositCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            description: description.into(),
        }
    }
}

/// Record a withdrawal for a user.
///
/// The balance check and the append are one atomic unit; see
/// [`Ledger::withdraw`](crate::Ledger::withdraw).
#[derive(Clone, Debug)]
pub struct WithdrawCmd {
    pub user_id: String,
    pub amount: Amount,
    pub description: String,
}

impl WithdrawCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            description: description.into(),
        }
    }
}

/// Move funds from one user to another.
///
/// Recorded as a linked `transfer_out`/`transfer_in` pair, never as its own
/// entry kind.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub sender_id: String,
    pub recipient_id: String,
    pub amount: Amount,
    pub description: String,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            amount,
            description: description.into(),
        }
    }
}
