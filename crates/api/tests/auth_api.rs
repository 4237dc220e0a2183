//! HTTP-level tests for login and the bearer-token gate.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, get, get_auth, memory_app, post_json, ADMIN_PASSWORD, ADMIN_USERNAME,
};
use serde_json::json;

#[tokio::test]
async fn login_success_returns_access_token() {
    let (_store, app) = memory_app();
    let body = json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD });
    let response = post_json(app.clone(), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["accessToken"].as_str().expect("accessToken");
    assert_eq!(json["data"]["expiresIn"], 3600);

    // The issued token opens the dashboard endpoints.
    let response = get_auth(app, "/api/submissions", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let (_store, app) = memory_app();
    let body = json!({ "username": ADMIN_USERNAME, "password": "nope" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid username or password");
}

#[tokio::test]
async fn login_unknown_user_gets_same_message() {
    let (_store, app) = memory_app();
    let body = json!({ "username": "mallory", "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid username or password");
}

#[tokio::test]
async fn dashboard_routes_require_token() {
    let (_store, app) = memory_app();

    for uri in [
        "/api/submissions",
        "/api/submissions/1",
        "/api/submissions/stats",
        "/api/submissions/export?ids=1",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (_store, app) = memory_app();
    let response = get_auth(app, "/api/submissions", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let (_store, app) = memory_app();
    let other = agency_api::auth::jwt::JwtConfig {
        secret: "some-other-secret".into(),
        access_token_expiry_mins: 60,
    };
    let forged = agency_api::auth::jwt::generate_access_token(ADMIN_USERNAME, &other).unwrap();

    let response = get_auth(app.clone(), "/api/submissions", &forged).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/submissions", &auth_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
}
