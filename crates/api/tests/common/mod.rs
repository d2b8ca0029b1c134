//! Common test utilities for integration tests.
//!
//! Database-backed tests run against `TEST_DATABASE_URL` and skip themselves
//! when it is unset.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use persistence::db::{create_lazy_pool, create_pool, run_migrations};
use shared::crypto::PresentedKey;
use spend_cap_api::{app, config::Config};

/// Config for tests; `database.url` comes from `TEST_DATABASE_URL` when set.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://nobody@127.0.0.1:1/none".to_string());
    let mut all = vec![
        ("database.url", url.as_str()),
        ("database.max_connections", "5"),
        ("database.min_connections", "0"),
        ("database.connect_timeout_secs", "2"),
        ("logging.format", "pretty"),
    ];
    all.extend_from_slice(overrides);
    Config::load_for_test(&all).expect("Failed to build test config")
}

/// Migrated pool, or `None` when no test database is configured.
pub async fn test_pool() -> Option<PgPool> {
    if std::env::var("TEST_DATABASE_URL").is_err() {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    }

    let config = test_config(&[]);
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// Router over a pool that never connects, for routes that do not touch it.
pub fn offline_app() -> Router {
    let config = test_config(&[]);
    let pool = create_lazy_pool(&config.database).expect("Failed to create lazy pool");
    app::create_app(config, pool).expect("Failed to build app")
}

/// Router over the test database.
pub fn create_test_app(pool: PgPool, overrides: &[(&str, &str)]) -> Router {
    app::create_app(test_config(overrides), pool).expect("Failed to build app")
}

async fn insert_api_key(pool: &PgPool, name: &str, is_admin: bool) -> String {
    let api_key = format!("sc_test_{}", Uuid::new_v4().simple());
    let parsed = PresentedKey::parse(&api_key).expect("Test API key should have valid format");
    let key_prefix = parsed.prefix().to_string();
    let key_hash = parsed.digest();

    sqlx::query(
        r#"
        INSERT INTO api_keys (name, key_prefix, key_hash, is_active, is_admin)
        VALUES ($1, $2, $3, true, $4)
        "#,
    )
    .bind(name)
    .bind(key_prefix)
    .bind(key_hash)
    .bind(is_admin)
    .execute(pool)
    .await
    .expect("Failed to create test API key");

    api_key
}

/// Storefront (non-admin) API key; returns the raw key.
pub async fn create_test_api_key(pool: &PgPool, name: &str) -> String {
    insert_api_key(pool, name, false).await
}

/// Admin API key; returns the raw key.
pub async fn create_test_admin_api_key(pool: &PgPool, name: &str) -> String {
    insert_api_key(pool, name, true).await
}

/// Seed an order for a customer.
pub async fn insert_order(
    pool: &PgPool,
    customer_id: Uuid,
    status: &str,
    total: Decimal,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        r#"
        INSERT INTO orders (customer_id, status, total, created_at)
        VALUES ($1, $2::order_status, $3, $4)
        "#,
    )
    .bind(customer_id)
    .bind(status)
    .bind(total)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to insert order");
}

/// Build a GET request with API key authentication.
pub fn get_request_with_api_key(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("X-API-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

/// Build a PUT request with API key authentication.
pub fn put_request_with_api_key(uri: &str, body: serde_json::Value, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", api_key)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Parse a JSON response body.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
