//! Route definitions for the `/submissions` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::submission;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// GET    /                -> list
/// GET    /stats           -> stats
/// GET    /export          -> export
/// POST   /bulk-delete     -> bulk_delete
/// GET    /{id}            -> get_by_id
/// DELETE /{id}            -> delete
/// PATCH  /{id}/status     -> update_status
/// PATCH  /{id}/notes      -> update_notes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submission::list))
        .route("/stats", get(submission::stats))
        .route("/export", get(submission::export))
        .route("/bulk-delete", post(submission::bulk_delete))
        .route(
            "/{id}",
            get(submission::get_by_id).delete(submission::delete),
        )
        .route("/{id}/status", patch(submission::update_status))
        .route("/{id}/notes", patch(submission::update_notes))
}
