//! Statements API endpoints

use api_types::statement::{
    BalanceResponse, StatementKind as ApiKind, StatementNew, StatementView, TransferNew,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use ledger::{Amount, DepositCmd, Statement, TransferCmd, WithdrawCmd, users};

fn map_kind(kind: ledger::StatementKind) -> ApiKind {
    match kind {
        ledger::StatementKind::Deposit => ApiKind::Deposit,
        ledger::StatementKind::Withdraw => ApiKind::Withdraw,
        ledger::StatementKind::TransferIn => ApiKind::TransferIn,
        ledger::StatementKind::TransferOut => ApiKind::TransferOut,
    }
}

fn map_statement(entry: Statement) -> StatementView {
    StatementView {
        id: entry.id,
        user_id: entry.user_id,
        kind: map_kind(entry.kind),
        amount: entry.amount.to_string(),
        description: entry.description,
        sender_id: entry.sender_id,
        created_at: entry.created_at,
    }
}

fn parse_amount(raw: &str) -> Result<Amount, ServerError> {
    raw.parse::<Amount>().map_err(ServerError::from)
}

pub async fn deposit_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StatementNew>,
) -> Result<(StatusCode, Json<StatementView>), ServerError> {
    let amount = parse_amount(&payload.amount)?;
    let entry = state
        .ledger
        .deposit(DepositCmd::new(user.id, amount, payload.description))
        .await?;

    Ok((StatusCode::CREATED, Json(map_statement(entry))))
}

pub async fn withdraw_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StatementNew>,
) -> Result<(StatusCode, Json<StatementView>), ServerError> {
    let amount = parse_amount(&payload.amount)?;
    let entry = state
        .ledger
        .withdraw(WithdrawCmd::new(user.id, amount, payload.description))
        .await?;

    Ok((StatusCode::CREATED, Json(map_statement(entry))))
}

/// Creates the linked `transfer_out`/`transfer_in` pair and returns the
/// sender's leg.
pub async fn transfer_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(recipient_id): Path<String>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<StatementView>), ServerError> {
    let amount = parse_amount(&payload.amount)?;
    let (outgoing, _incoming) = state
        .ledger
        .transfer(TransferCmd::new(
            user.id,
            recipient_id,
            amount,
            payload.description,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(map_statement(outgoing))))
}

pub async fn balance(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let (entries, balance) = state.ledger.statement_with_balance(&user.id).await?;

    Ok(Json(BalanceResponse {
        statement: entries.into_iter().map(map_statement).collect(),
        balance: balance.to_string(),
    }))
}

pub async fn get_operation(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatementView>, ServerError> {
    let entry = state.ledger.statement_operation(&user.id, id).await?;

    Ok(Json(map_statement(entry)))
}
