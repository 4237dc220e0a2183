use agency_core::types::DbId;

/// Errors from the submissions HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Status {
        status: u16,
        /// The server's `error` message, or the raw body when it is not JSON.
        message: String,
    },
}

impl ApiError {
    /// Text suitable for an inline notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Status { message, .. } => message.clone(),
        }
    }
}

/// Errors from dashboard actions.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Another bulk action is still in flight.
    #[error("Another bulk action is in progress")]
    Busy,

    /// A bulk action was triggered with no visible row selected.
    #[error("No submissions selected")]
    NothingSelected,

    #[error("Submission {0} is not loaded")]
    UnknownRow(DbId),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The export was fetched but could not be handed to the user.
    #[error("Download failed: {0}")]
    Download(#[from] std::io::Error),
}
