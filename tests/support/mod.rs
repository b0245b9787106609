#![allow(dead_code)]
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use todo_api::{
    app::build_app,
    config::{AppConfig, DEFAULT_SESSION_HEADER},
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
        db_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 0,
        session_header: DEFAULT_SESSION_HEADER.into(),
    }
}

pub fn test_app(pool: PgPool) -> Router {
    build_app(AppState::from_parts(pool, Arc::new(test_config())))
}

/// Sends a request and returns the status plus the decoded body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(DEFAULT_SESSION_HEADER, token);
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Sends a raw JSON-typed body, for exercising malformed payloads.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    raw: &str,
) -> StatusCode {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header(DEFAULT_SESSION_HEADER, token);
    }
    let request = builder.body(Body::from(raw.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> StatusCode {
    let (status, _) = send(
        app,
        "POST",
        "/user",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    status
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Registers a user under `email` and returns a fresh session token.
pub async fn signup(app: &Router, email: &str) -> String {
    assert_eq!(register(app, "Test", email, "pw").await, StatusCode::CREATED);
    let (status, body) = login(app, email, "pw").await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().expect("token").to_string()
}

pub async fn add_todo(app: &Router, token: &str, description: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/todo",
        Some(token),
        Some(json!({ "description": description })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

pub async fn list_todos(app: &Router, token: &str) -> Vec<Value> {
    let (status, body) = send(app, "GET", "/todo", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().expect("todo array").clone()
}

pub fn todo_id(item: &Value) -> Uuid {
    Uuid::parse_str(item["id"].as_str().expect("id")).expect("uuid id")
}
