//! Public contact-form intake.

use agency_core::contact::{validate_contact, ContactInput};
use agency_core::error::CoreError;
use agency_core::submission::NewSubmission;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::client_addr::ClientAddr;
use crate::response::DataResponse;
use crate::state::AppState;

const MALFORMED_FORM: &str = "Invalid contact form";

/// Acknowledgement returned to the visitor.
#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub message: &'static str,
}

/// POST /api/contact
///
/// Validate the form, attach the client IP and location, and persist it with
/// status `new`. No authentication.
///
/// A body that is not a JSON contact form gets a fixed message; serde's
/// path and type details are only logged.
pub async fn submit(
    State(state): State<AppState>,
    ClientAddr(client): ClientAddr,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<ContactAccepted>>> {
    let Json(input) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected contact body");
        CoreError::Validation(MALFORMED_FORM.to_string())
    })?;
    let input = validate_contact(&input)?;
    let enrichment = state.enricher.enrich(client).await;

    let submission = state
        .store
        .create(&NewSubmission {
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            ip_address: enrichment.ip_address,
            location: enrichment.location,
        })
        .await?;

    tracing::info!(
        submission_id = submission.id,
        ip = %submission.ip_address,
        location = ?submission.location,
        "Contact submission received",
    );

    Ok(Json(DataResponse {
        data: ContactAccepted {
            message: "Thanks for reaching out. We will get back to you soon.",
        },
    }))
}
