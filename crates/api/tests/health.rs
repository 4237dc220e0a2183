//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, memory_app, FailingStore};

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let (_store, app) = memory_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["dbHealthy"], true);
}

#[tokio::test]
async fn health_check_reports_degraded_store() {
    let app = common::build_test_app(Arc::new(FailingStore));
    let json = body_json(get(app, "/health").await).await;

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["dbHealthy"], false);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (_store, app) = memory_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (_store, app) = memory_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // A UUID is 36 chars with hyphens.
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
