pub mod auth;
pub mod contact;
pub mod health;
pub mod submission;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                         login (public)
///
/// /contact                            submit contact form (public)
///
/// /submissions                        list, search (requires auth)
/// /submissions/stats                  counts per status
/// /submissions/export                 CSV download (?ids= or ?query=&status=)
/// /submissions/bulk-delete            delete many (POST)
/// /submissions/{id}                   get, delete
/// /submissions/{id}/status            update status (PATCH)
/// /submissions/{id}/notes             update notes (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/contact", contact::router())
        .nest("/submissions", submission::router())
}
