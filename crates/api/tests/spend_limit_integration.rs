//! Admin spend limit routes against PostgreSQL.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn spend_limit_uri(customer_id: Uuid) -> String {
    format!("/api/v1/admin/customers/{}/spend-limit", customer_id)
}

#[tokio::test]
async fn test_update_and_read_spend_limit() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let app = common::create_test_app(pool.clone(), &[]);
    let admin_key = common::create_test_admin_api_key(&pool, "spend_limit_admin").await;
    let customer_id = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(common::put_request_with_api_key(
            &spend_limit_uri(customer_id),
            json!({"maximumSpendAmount": "500.00", "spendLimitPeriod": 14}),
            &admin_key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(common::get_request_with_api_key(
            &spend_limit_uri(customer_id),
            &admin_key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::parse_response_body(response).await;
    assert_eq!(json["customerId"], customer_id.to_string());
    assert_eq!(json["maximumSpendAmount"], "500.00");
    assert_eq!(json["spendLimitPeriod"], 14);
    assert_eq!(json["active"], true);
}

#[tokio::test]
async fn test_update_overwrites_previous_values() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let app = common::create_test_app(pool.clone(), &[]);
    let admin_key = common::create_test_admin_api_key(&pool, "spend_limit_admin").await;
    let customer_id = Uuid::new_v4();

    for body in [
        json!({"maximumSpendAmount": "100", "spendLimitPeriod": 7}),
        json!({"maximumSpendAmount": "", "spendLimitPeriod": 0}),
    ] {
        let response = app
            .clone()
            .oneshot(common::put_request_with_api_key(
                &spend_limit_uri(customer_id),
                body,
                &admin_key,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(common::get_request_with_api_key(
            &spend_limit_uri(customer_id),
            &admin_key,
        ))
        .await
        .unwrap();
    let json = common::parse_response_body(response).await;
    assert_eq!(json["maximumSpendAmount"], "");
    assert_eq!(json["spendLimitPeriod"], 0);
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn test_update_rejects_invalid_amount() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let app = common::create_test_app(pool.clone(), &[]);
    let admin_key = common::create_test_admin_api_key(&pool, "spend_limit_admin").await;

    let response = app
        .oneshot(common::put_request_with_api_key(
            &spend_limit_uri(Uuid::new_v4()),
            json!({"maximumSpendAmount": "a lot", "spendLimitPeriod": 7}),
            &admin_key,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = common::parse_response_body(response).await;
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_non_admin_key_is_forbidden() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let app = common::create_test_app(pool.clone(), &[]);
    let api_key = common::create_test_api_key(&pool, "storefront").await;

    let response = app
        .oneshot(common::get_request_with_api_key(
            &spend_limit_uri(Uuid::new_v4()),
            &api_key,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_key_is_unauthorized() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let app = common::create_test_app(pool, &[]);

    let response = app
        .oneshot(common::get_request_with_api_key(
            &spend_limit_uri(Uuid::new_v4()),
            "sc_unknown_key_0000",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
