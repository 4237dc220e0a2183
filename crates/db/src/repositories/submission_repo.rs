//! Repository for the `submissions` table.

use agency_core::search::{escape_like, ListFilter};
use agency_core::submission::{NewSubmission, SubmissionStatus};
use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::{LocationColumns, SubmissionRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, subject, message, status, ip_address, \
     location_kind, city, region, country, lat, lng, notes, created_at";

/// Newest first; the id tiebreak keeps pagination stable.
const ORDER_BY: &str = "ORDER BY created_at DESC, id DESC";

/// Provides CRUD and bulk operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission with status `new` and empty notes.
    pub async fn create(pool: &PgPool, input: &NewSubmission) -> Result<SubmissionRow, sqlx::Error> {
        let location = LocationColumns::from(&input.location);
        let query = format!(
            "INSERT INTO submissions
                (name, email, subject, message, status, ip_address,
                 location_kind, city, region, country, lat, lng)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(SubmissionStatus::New.as_str())
            .bind(&input.ip_address)
            .bind(location.kind)
            .bind(location.city)
            .bind(location.region)
            .bind(location.country)
            .bind(location.lat)
            .bind(location.lng)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find every submission whose id is in `ids`, newest first. Missing ids
    /// are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = ANY($1) {ORDER_BY}");
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List submissions matching `filter`, newest first. `limit = None`
    /// returns every match.
    pub async fn list(
        pool: &PgPool,
        filter: &ListFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let (where_clause, bind_idx) = Self::where_clause(filter);
        let mut query = format!("SELECT {COLUMNS} FROM submissions {where_clause} {ORDER_BY}");
        if limit.is_some() {
            query.push_str(&format!(" LIMIT ${bind_idx} OFFSET ${}", bind_idx + 1));
        }

        let mut q = sqlx::query_as::<_, SubmissionRow>(&query);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(term) = filter.term() {
            q = q.bind(format!("%{}%", escape_like(term)));
        }
        if let Some(limit) = limit {
            q = q.bind(limit).bind(offset);
        }
        q.fetch_all(pool).await
    }

    /// Count submissions matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ListFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM submissions {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(term) = filter.term() {
            q = q.bind(format!("%{}%", escape_like(term)));
        }
        q.fetch_one(pool).await
    }

    /// Set the status of a submission. Returns `None` if no row matched.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the notes of a submission. Returns `None` if no row matched.
    pub async fn update_notes(
        pool: &PgPool,
        id: DbId,
        notes: &str,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET notes = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a submission. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete every submission in `ids`, returning the number of
    /// rows actually removed.
    pub async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Row counts grouped by status. Statuses with no rows are absent.
    pub async fn status_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM submissions GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    // ---- private helpers ----

    /// Build the `WHERE` clause for `filter`. Returns the clause and the next
    /// free bind index. Bind order: status, then the query pattern.
    fn where_clause(filter: &ListFilter) -> (String, u32) {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.term().is_some() {
            conditions.push(format!(
                "(name ILIKE ${bind_idx} OR email ILIKE ${bind_idx} \
                 OR subject ILIKE ${bind_idx} OR message ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (clause, bind_idx)
    }
}
