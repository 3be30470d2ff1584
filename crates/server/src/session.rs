//! Session endpoint: exchanges credentials for a bearer token.

use api_types::session::{SessionCreated, SessionNew};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, user::map_user};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SessionNew>,
) -> Result<Json<SessionCreated>, ServerError> {
    let (session, user) = state
        .ledger
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(SessionCreated {
        token: session.token,
        user: map_user(user),
    }))
}
