use std::sync::Arc;

use agency_db::SubmissionStore;

use crate::config::ServerConfig;
use crate::enrichment::Enricher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Submission persistence (Postgres or in-memory).
    pub store: Arc<dyn SubmissionStore>,
    /// Server configuration (JWT secret, admin credentials, timeouts).
    pub config: Arc<ServerConfig>,
    /// IP/location enrichment for new submissions.
    pub enricher: Arc<Enricher>,
}
