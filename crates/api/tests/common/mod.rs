#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use agency_api::auth::jwt::{generate_access_token, JwtConfig};
use agency_api::auth::password::hash_password;
use agency_api::config::{AdminConfig, ServerConfig};
use agency_api::enrichment::geo::{EnrichmentError, GeoConfig, GeoLocator};
use agency_api::enrichment::Enricher;
use agency_api::router::build_app_router;
use agency_api::state::AppState;
use agency_core::search::ListFilter;
use agency_core::submission::{
    GeoLocation, Location, NewSubmission, Submission, SubmissionStatus,
};
use agency_core::types::DbId;
use agency_db::{MemorySubmissionStore, StoreError, StoreResult, SubmissionStore};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Argon2 hashing is slow; hash the test password once per test binary.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password_hash: admin_password_hash(),
        },
        geo: GeoConfig {
            base_url: "http://geo.invalid".to_string(),
            api_key: None,
            timeout: Duration::from_millis(200),
        },
    }
}

/// A valid access token for the test operator.
pub fn auth_token() -> String {
    generate_access_token(ADMIN_USERNAME, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

pub fn hyderabad() -> GeoLocation {
    GeoLocation {
        city: "Hyderabad".into(),
        region: "Telangana".into(),
        country: "India".into(),
        lat: 17.385,
        lng: 78.4867,
    }
}

/// Answers every lookup with a fixed result.
pub struct StubLocator {
    pub answer: Option<GeoLocation>,
}

#[async_trait]
impl GeoLocator for StubLocator {
    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation, EnrichmentError> {
        self.answer
            .clone()
            .ok_or_else(|| EnrichmentError::Lookup("stubbed failure".into()))
    }
}

/// A store whose backing database is unreachable.
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Corrupt {
        id: 0,
        reason: "connection refused".into(),
    })
}

#[async_trait]
impl SubmissionStore for FailingStore {
    async fn create(&self, _input: &NewSubmission) -> StoreResult<Submission> {
        unavailable()
    }
    async fn find_by_id(&self, _id: DbId) -> StoreResult<Option<Submission>> {
        unavailable()
    }
    async fn find_many(&self, _ids: &[DbId]) -> StoreResult<Vec<Submission>> {
        unavailable()
    }
    async fn list(&self, _f: &ListFilter, _l: i64, _o: i64) -> StoreResult<Vec<Submission>> {
        unavailable()
    }
    async fn list_all(&self, _f: &ListFilter) -> StoreResult<Vec<Submission>> {
        unavailable()
    }
    async fn count(&self, _f: &ListFilter) -> StoreResult<i64> {
        unavailable()
    }
    async fn update_status(
        &self,
        _id: DbId,
        _status: SubmissionStatus,
    ) -> StoreResult<Option<Submission>> {
        unavailable()
    }
    async fn update_notes(&self, _id: DbId, _notes: &str) -> StoreResult<Option<Submission>> {
        unavailable()
    }
    async fn delete(&self, _id: DbId) -> StoreResult<bool> {
        unavailable()
    }
    async fn delete_many(&self, _ids: &[DbId]) -> StoreResult<u64> {
        unavailable()
    }
    async fn status_counts(&self) -> StoreResult<Vec<(SubmissionStatus, i64)>> {
        unavailable()
    }
    async fn health_check(&self) -> StoreResult<()> {
        unavailable()
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router over `store`, resolving every routable
/// address to Hyderabad.
pub fn build_test_app(store: Arc<dyn SubmissionStore>) -> Router {
    build_test_app_with_locator(store, Some(hyderabad()))
}

/// Build the full application router with a stub locator. `None` makes
/// every lookup fail.
pub fn build_test_app_with_locator(
    store: Arc<dyn SubmissionStore>,
    answer: Option<GeoLocation>,
) -> Router {
    let config = test_config();
    let enricher = Enricher::new(Arc::new(StubLocator { answer }), config.geo.timeout);
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        enricher: Arc::new(enricher),
    };
    build_app_router(state, &config)
}

/// An empty in-memory store plus a router over it.
pub fn memory_app() -> (Arc<MemorySubmissionStore>, Router) {
    let store = Arc::new(MemorySubmissionStore::new());
    let app = build_test_app(store.clone());
    (store, app)
}

/// Insert `n` submissions directly into the store, returning their ids in
/// insertion order.
pub async fn seed(store: &MemorySubmissionStore, n: usize) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let s = store
            .create(&NewSubmission {
                name: format!("Client {i}"),
                email: format!("client{i}@example.com"),
                subject: format!("Project {i}"),
                message: "We need a new website".into(),
                ip_address: "127.0.0.1".into(),
                location: Location::local(),
            })
            .await
            .expect("seed insert");
        ids.push(s.id);
    }
    ids
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Authenticated GET as a browser page served from `origin`.
pub async fn get_auth_from_origin(
    app: Router,
    uri: &str,
    token: &str,
    origin: &str,
) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("origin", origin)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

/// POST as a visitor whose request was forwarded for `client_ip`.
pub async fn post_json_from(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    client_ip: &str,
) -> Response<Body> {
    let mut request = json_request(Method::POST, uri, &body, None);
    request
        .headers_mut()
        .insert("x-forwarded-for", client_ip.parse().unwrap());
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
