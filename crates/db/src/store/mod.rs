//! The [`SubmissionStore`] abstraction the API is written against.
//!
//! Two implementations ship with the crate:
//!
//! - [`PgSubmissionStore`] -- Postgres via [`crate::repositories::SubmissionRepo`].
//! - [`MemorySubmissionStore`] -- process-local, for development without a
//!   database and for tests.

mod memory;
mod postgres;

pub use memory::MemorySubmissionStore;
pub use postgres::PgSubmissionStore;

use agency_core::search::ListFilter;
use agency_core::submission::{NewSubmission, Submission, SubmissionStatus};
use agency_core::types::DbId;
use async_trait::async_trait;

use crate::error::StoreResult;

/// Persistence operations over the submission collection.
///
/// Every mutating call writes through before returning. Single-row writes
/// are atomic; [`SubmissionStore::delete_many`] deletes whatever exists and
/// reports how many rows went away.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a new submission with status `new` and empty notes.
    async fn create(&self, input: &NewSubmission) -> StoreResult<Submission>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Submission>>;

    /// Submissions whose id is in `ids`, newest first. Missing ids are skipped.
    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Submission>>;

    /// Page of submissions matching `filter`, newest first.
    async fn list(&self, filter: &ListFilter, limit: i64, offset: i64)
        -> StoreResult<Vec<Submission>>;

    /// Every submission matching `filter`, newest first.
    async fn list_all(&self, filter: &ListFilter) -> StoreResult<Vec<Submission>>;

    async fn count(&self, filter: &ListFilter) -> StoreResult<i64>;

    /// Returns `None` when no submission has this id.
    async fn update_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> StoreResult<Option<Submission>>;

    /// Overwrites the notes. Returns `None` when no submission has this id.
    async fn update_notes(&self, id: DbId, notes: &str) -> StoreResult<Option<Submission>>;

    /// Returns `true` if a submission was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Returns the number of submissions actually removed.
    async fn delete_many(&self, ids: &[DbId]) -> StoreResult<u64>;

    /// Count per status, including zero counts, in lifecycle order.
    async fn status_counts(&self) -> StoreResult<Vec<(SubmissionStatus, i64)>>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
