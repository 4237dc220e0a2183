use agency_core::search::ListFilter;
use agency_core::submission::{NewSubmission, Submission, SubmissionStatus};
use agency_core::types::DbId;
use async_trait::async_trait;

use super::SubmissionStore;
use crate::error::StoreResult;
use crate::models::submission::SubmissionRow;
use crate::repositories::SubmissionRepo;
use crate::DbPool;

/// [`SubmissionStore`] backed by the `submissions` table.
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: DbPool,
}

impl PgSubmissionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_all(rows: Vec<SubmissionRow>) -> StoreResult<Vec<Submission>> {
    rows.into_iter().map(Submission::try_from).collect()
}

fn decode_opt(row: Option<SubmissionRow>) -> StoreResult<Option<Submission>> {
    row.map(Submission::try_from).transpose()
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn create(&self, input: &NewSubmission) -> StoreResult<Submission> {
        let row = SubmissionRepo::create(&self.pool, input).await?;
        Submission::try_from(row)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Submission>> {
        decode_opt(SubmissionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Submission>> {
        decode_all(SubmissionRepo::find_many(&self.pool, ids).await?)
    }

    async fn list(
        &self,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Submission>> {
        decode_all(SubmissionRepo::list(&self.pool, filter, Some(limit), offset).await?)
    }

    async fn list_all(&self, filter: &ListFilter) -> StoreResult<Vec<Submission>> {
        decode_all(SubmissionRepo::list(&self.pool, filter, None, 0).await?)
    }

    async fn count(&self, filter: &ListFilter) -> StoreResult<i64> {
        Ok(SubmissionRepo::count(&self.pool, filter).await?)
    }

    async fn update_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> StoreResult<Option<Submission>> {
        decode_opt(SubmissionRepo::update_status(&self.pool, id, status).await?)
    }

    async fn update_notes(&self, id: DbId, notes: &str) -> StoreResult<Option<Submission>> {
        decode_opt(SubmissionRepo::update_notes(&self.pool, id, notes).await?)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(SubmissionRepo::delete(&self.pool, id).await?)
    }

    async fn delete_many(&self, ids: &[DbId]) -> StoreResult<u64> {
        Ok(SubmissionRepo::delete_many(&self.pool, ids).await?)
    }

    async fn status_counts(&self) -> StoreResult<Vec<(SubmissionStatus, i64)>> {
        let rows = SubmissionRepo::status_counts(&self.pool).await?;
        let mut counts = Vec::with_capacity(SubmissionStatus::ALL.len());
        for status in SubmissionStatus::ALL {
            let n = rows
                .iter()
                .find(|(label, _)| label == status.as_str())
                .map_or(0, |(_, n)| *n);
            counts.push((status, n));
        }
        for (label, n) in &rows {
            if SubmissionStatus::parse(label).is_err() {
                tracing::warn!(status = %label, count = n, "Ignoring unexpected submission status");
            }
        }
        Ok(counts)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
