//! User endpoints: registration and profile.

use api_types::user::{UserNew, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use ledger::users;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_user(user: users::Model) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .ledger
        .create_user(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn profile(
    Extension(user): Extension<users::Model>,
) -> Result<Json<UserView>, ServerError> {
    Ok(Json(map_user(user)))
}
