//! Handlers for the `/submissions` resource.
//!
//! Every handler requires an authenticated operator and writes through to
//! the store before responding.

use std::collections::BTreeMap;

use agency_core::contact::validate_notes;
use agency_core::export::{export_filename, submissions_to_csv, CSV_CONTENT_TYPE};
use agency_core::search::{
    clamp_limit, clamp_offset, dedup_ids, parse_id_list, validate_bulk_ids, ListFilter,
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use agency_core::submission::{Submission, SubmissionStatus};
use agency_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{ExportParams, SubmissionListParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One page of submissions plus the total number of matches.
#[derive(Debug, Serialize)]
pub struct SubmissionPage {
    pub items: Vec<Submission>,
    pub total: i64,
}

/// Request body for `PATCH /submissions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `PATCH /submissions/{id}/notes`.
#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

/// Request body for `POST /submissions/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}

/// Totals for the dashboard header cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total: i64,
    pub by_status: BTreeMap<&'static str, i64>,
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/submissions?query=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<Json<DataResponse<SubmissionPage>>> {
    let filter = ListFilter::from_params(params.query.as_deref(), params.status.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = state.store.list(&filter, limit, offset).await?;
    let total = state.store.count(&filter).await?;

    Ok(Json(DataResponse {
        data: SubmissionPage { items, total },
    }))
}

/// GET /api/submissions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let submission = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::submission_not_found(id))?;
    Ok(Json(DataResponse { data: submission }))
}

/// GET /api/submissions/stats
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<SubmissionStats>>> {
    let counts = state.store.status_counts().await?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    let by_status = counts
        .into_iter()
        .map(|(status, n)| (status.as_str(), n))
        .collect();

    Ok(Json(DataResponse {
        data: SubmissionStats { total, by_status },
    }))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PATCH /api/submissions/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let status = SubmissionStatus::parse(&input.status)?;
    let submission = state
        .store
        .update_status(id, status)
        .await?
        .ok_or_else(|| AppError::submission_not_found(id))?;

    tracing::info!(submission_id = id, %status, user = %user.username, "Submission status updated");
    Ok(Json(DataResponse { data: submission }))
}

/// PATCH /api/submissions/{id}/notes
///
/// Overwrites the notes; an empty string clears them.
pub async fn update_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNotesRequest>,
) -> AppResult<Json<DataResponse<Submission>>> {
    validate_notes(&input.notes)?;
    let submission = state
        .store
        .update_notes(id, &input.notes)
        .await?
        .ok_or_else(|| AppError::submission_not_found(id))?;

    tracing::info!(submission_id = id, user = %user.username, "Submission notes updated");
    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/submissions/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.store.delete(id).await? {
        return Err(AppError::submission_not_found(id));
    }
    tracing::info!(submission_id = id, user = %user.username, "Submission deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/submissions/bulk-delete
///
/// Deletes whichever of `ids` still exist and reports how many went away.
/// Ids that are already gone are not an error.
pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<Json<DataResponse<BulkDeleteResponse>>> {
    let ids = dedup_ids(input.ids);
    validate_bulk_ids(&ids)?;

    let deleted_count = state.store.delete_many(&ids).await?;

    tracing::info!(
        requested = ids.len(),
        deleted = deleted_count,
        user = %user.username,
        "Bulk delete completed",
    );
    Ok(Json(DataResponse {
        data: BulkDeleteResponse { deleted_count },
    }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/submissions/export?ids=1,2,3
/// GET /api/submissions/export?query=&status=
///
/// CSV download. With `ids`, exports those that still exist; otherwise
/// exports every submission matching the filter.
pub async fn export(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let submissions = match params.ids.as_deref() {
        Some(raw) => {
            let ids = parse_id_list(raw)?;
            validate_bulk_ids(&ids)?;
            state.store.find_many(&ids).await?
        }
        None => {
            let filter =
                ListFilter::from_params(params.query.as_deref(), params.status.as_deref())?;
            state.store.list_all(&filter).await?
        }
    };

    tracing::info!(rows = submissions.len(), user = %user.username, "Submissions exported");

    let csv = submissions_to_csv(&submissions);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(chrono::Utc::now())
    );

    Ok((
        [
            (CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
