use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{session, statements, user};
use ledger::{Ledger, sessions, users};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub db: DatabaseConnection,
}

/// Resolves the bearer token to a user row and stores it as a request
/// extension. Everything behind this layer trusts that identity completely.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let token = auth_header.token();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let session: Option<sessions::Model> = sessions::Entity::find_by_id(token)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let Some(session) = session else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user: Option<users::Model> = users::Entity::find_by_id(&session.user_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/v1/profile", get(user::profile))
        .route("/api/v1/statements/deposit", post(statements::deposit_new))
        .route(
            "/api/v1/statements/withdraw",
            post(statements::withdraw_new),
        )
        .route(
            "/api/v1/statements/transfers/{user_id}",
            post(statements::transfer_new),
        )
        .route("/api/v1/statements/balance", get(statements::balance))
        .route("/api/v1/statements/{id}", get(statements::get_operation))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/api/v1/users", post(user::create))
        .route("/api/v1/sessions", post(session::create))
        .with_state(state)
}

pub async fn run(ledger: Ledger, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        ledger: Arc::new(ledger),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
