//! HTTP client for the submissions API.
//!
//! [`SubmissionsApi`] is what the dashboard controller is written against;
//! [`HttpSubmissionsClient`] talks to the real server with [`reqwest`].

use agency_core::contact::ContactInput;
use agency_core::search::{ListFilter, MAX_LIST_LIMIT};
use agency_core::submission::{Submission, SubmissionStatus};
use agency_core::types::DbId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// Filename used when the server sends no `Content-Disposition`.
const FALLBACK_EXPORT_FILENAME: &str = "submissions.csv";

/// A CSV file returned by the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// Operations the dashboard performs against the submissions API.
#[async_trait]
pub trait SubmissionsApi: Send + Sync {
    /// Submissions matching `filter`, newest first.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Submission>, ApiError>;

    async fn get(&self, id: DbId) -> Result<Submission, ApiError>;

    async fn update_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<Submission, ApiError>;

    async fn update_notes(&self, id: DbId, notes: &str) -> Result<Submission, ApiError>;

    async fn delete(&self, id: DbId) -> Result<(), ApiError>;

    /// Returns the number of submissions the server actually deleted.
    async fn bulk_delete(&self, ids: &[DbId]) -> Result<u64, ApiError>;

    async fn export(&self, ids: &[DbId]) -> Result<CsvExport, ApiError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct Page {
    items: Vec<Submission>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkDeleteData {
    deleted_count: u64,
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for the submissions API, authenticated with a bearer token.
pub struct HttpSubmissionsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSubmissionsClient {
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Log in as the dashboard operator and return an authenticated client.
    pub async fn login(
        base_url: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::new();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;
        let login: LoginData = Self::parse_data(response).await?;

        tracing::debug!(%base_url, "Dashboard client logged in");
        Ok(Self::with_client(client, base_url, login.access_token))
    }

    /// Post the public contact form. Does not need the operator token.
    pub async fn submit_contact(&self, input: &ContactInput) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/contact"))
            .json(input)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`ApiError::Status`] carrying the server's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Check the status, then decode the `{ "data": T }` envelope.
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

fn ids_param(ids: &[DbId]) -> String {
    ids.iter()
        .map(DbId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Extract `filename="..."` from a `Content-Disposition` value.
fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[async_trait]
impl SubmissionsApi for HttpSubmissionsClient {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Submission>, ApiError> {
        let mut query = vec![("limit", MAX_LIST_LIMIT.to_string())];
        if let Some(term) = filter.term() {
            query.push(("query", term.to_string()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }

        let response = self
            .authed(self.client.get(self.url("/api/submissions")))
            .query(&query)
            .send()
            .await?;
        let page: Page = Self::parse_data(response).await?;
        Ok(page.items)
    }

    async fn get(&self, id: DbId) -> Result<Submission, ApiError> {
        let response = self
            .authed(self.client.get(self.url(&format!("/api/submissions/{id}"))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn update_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<Submission, ApiError> {
        let response = self
            .authed(
                self.client
                    .patch(self.url(&format!("/api/submissions/{id}/status"))),
            )
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn update_notes(&self, id: DbId, notes: &str) -> Result<Submission, ApiError> {
        let response = self
            .authed(
                self.client
                    .patch(self.url(&format!("/api/submissions/{id}/notes"))),
            )
            .json(&serde_json::json!({ "notes": notes }))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn delete(&self, id: DbId) -> Result<(), ApiError> {
        let response = self
            .authed(self.client.delete(self.url(&format!("/api/submissions/{id}"))))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[DbId]) -> Result<u64, ApiError> {
        let response = self
            .authed(self.client.post(self.url("/api/submissions/bulk-delete")))
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await?;
        let data: BulkDeleteData = Self::parse_data(response).await?;
        Ok(data.deleted_count)
    }

    async fn export(&self, ids: &[DbId]) -> Result<CsvExport, ApiError> {
        let response = self
            .authed(self.client.get(self.url("/api/submissions/export")))
            .query(&[("ids", ids_param(ids))])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| FALLBACK_EXPORT_FILENAME.to_string());
        let body = response.text().await?;

        Ok(CsvExport { filename, body })
    }
}
