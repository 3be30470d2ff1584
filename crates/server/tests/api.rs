use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;
use server::{ServerState, router};

async fn test_router() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let ledger = ledger::Ledger::builder().database(db.clone()).build();
    router(ServerState {
        ledger: Arc::new(ledger),
        db,
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_user_returns_201_without_password() {
    let app = test_router().await;

    let body = register(&app, "Israel", "israel@example.com", "1234").await;
    assert!(body["id"].is_string());
    assert_eq!(body["name"], "Israel");
    assert_eq!(body["email"], "israel@example.com");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn create_user_with_existing_email_is_rejected() {
    let app = test_router().await;

    register(&app, "Israel", "israel@example.com", "1234").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({ "name": "Wilson", "email": "israel@example.com", "password": "4321" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn session_returns_token_and_user() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "admin@example.com", "password": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "admin@example.com");
}

#[tokio::test]
async fn session_rejects_bad_credentials() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "admin@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["token"].is_null());

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_valid_token() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    let (status, body) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "admin");
    assert_eq!(body["email"], "admin@example.com");

    let (status, _) = send(&app, "GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/v1/profile", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deposit_creates_statement() {
    let app = test_router().await;
    let user = register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 150, "description": "monthly income" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());
    assert_eq!(body["user_id"], user["id"]);
    assert_eq!(body["type"], "deposit");
    assert_eq!(body["amount"], "150.00");
}

#[tokio::test]
async fn deposit_requires_authentication() {
    let app = test_router().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        None,
        Some(json!({ "amount": 150, "description": "monthly income" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn withdraw_without_funds_is_rejected() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/statements/withdraw",
        Some(&token),
        Some(json!({ "amount": 500, "description": "lottery bet" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn balance_reports_statement_list_and_total() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 150, "description": "monthly income" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/statements/withdraw",
        Some(&token),
        Some(json!({ "amount": 50, "description": "income tax" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/v1/statements/balance", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let statement = body["statement"].as_array().unwrap();
    assert_eq!(statement.len(), 2);
    assert!(statement[0]["id"].is_string());
    assert_eq!(body["balance"], "100.00");
}

#[tokio::test]
async fn statement_operation_returns_entry_detail() {
    let app = test_router().await;
    let user = register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 150, "description": "monthly income" })),
    )
    .await;

    let uri = format!("/api/v1/statements/{}", created["id"].as_str().unwrap());
    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user["id"]);
    assert_eq!(body["amount"], "150.00");
    assert_eq!(body["type"], "deposit");
}

#[tokio::test]
async fn statement_operation_hides_foreign_and_unknown_entries() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    register(&app, "guest", "guest@example.com", "guest").await;
    let admin_token = login(&app, "admin@example.com", "admin").await;
    let guest_token = login(&app, "guest@example.com", "guest").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&admin_token),
        Some(json!({ "amount": 150, "description": "monthly income" })),
    )
    .await;

    // Another user's entry and a missing entry look the same.
    let uri = format!("/api/v1/statements/{}", created["id"].as_str().unwrap());
    let (status, _) = send(&app, "GET", &uri, Some(&guest_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/statements/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transfer_credits_the_recipient() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let guest = register(&app, "guest", "guest@example.com", "guest").await;
    let admin_token = login(&app, "admin@example.com", "admin").await;
    let guest_token = login(&app, "guest@example.com", "guest").await;

    send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&admin_token),
        Some(json!({ "amount": 100, "description": "pay" })),
    )
    .await;

    let uri = format!(
        "/api/v1/statements/transfers/{}",
        guest["id"].as_str().unwrap()
    );
    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&admin_token),
        Some(json!({ "amount": 40, "description": "split dinner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "transfer_out");
    assert_eq!(body["amount"], "40.00");
    assert_eq!(body["sender_id"], guest["id"]);

    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/statements/balance",
        Some(&guest_token),
        None,
    )
    .await;
    assert_eq!(body["balance"], "40.00");
    let statement = body["statement"].as_array().unwrap();
    assert_eq!(statement[0]["type"], "transfer_in");
}

#[tokio::test]
async fn transfer_without_funds_is_rejected() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let guest = register(&app, "guest", "guest@example.com", "guest").await;
    let admin_token = login(&app, "admin@example.com", "admin").await;
    let guest_token = login(&app, "guest@example.com", "guest").await;

    let uri = format!(
        "/api/v1/statements/transfers/{}",
        guest["id"].as_str().unwrap()
    );
    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&admin_token),
        Some(json!({ "amount": 40, "description": "split dinner" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/statements/balance",
        Some(&guest_token),
        None,
    )
    .await;
    assert_eq!(body["balance"], "0.00");
    assert!(body["statement"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_amounts_and_descriptions_are_rejected() {
    let app = test_router().await;
    register(&app, "admin", "admin@example.com", "admin").await;
    let token = login(&app, "admin@example.com", "admin").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": "not a number", "description": "pay" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 0, "description": "pay" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/statements/deposit",
        Some(&token),
        Some(json!({ "amount": 10, "description": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
