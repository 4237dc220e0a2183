/// Errors raised by a [`crate::SubmissionStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database is unreachable or rejected the query.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped into the domain model.
    #[error("Corrupt submission row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
