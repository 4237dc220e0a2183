//! Listing, search and pagination helpers for submissions.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::CoreError;
use crate::submission::{Submission, SubmissionStatus};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of submissions per page.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of submissions per page.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Maximum number of ids accepted by bulk delete and export in one call.
pub const MAX_BULK_IDS: usize = 1_000;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Free-text query plus optional status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub query: Option<String>,
    pub status: Option<SubmissionStatus>,
}

impl ListFilter {
    /// Build a filter from raw query-string values. A blank query is dropped;
    /// a blank status means "any".
    pub fn from_params(query: Option<&str>, status: Option<&str>) -> Result<Self, CoreError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(SubmissionStatus::parse(s)?),
            None => None,
        };
        Ok(Self { query, status })
    }

    /// The query term, if one is set and non-blank.
    pub fn term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Whether a submission is visible under `filter`.
///
/// The query is matched as a case-insensitive substring of name, email,
/// subject or message.
pub fn matches_filter(submission: &Submission, filter: &ListFilter) -> bool {
    if let Some(status) = filter.status {
        if submission.status != status {
            return false;
        }
    }
    let Some(term) = filter.term() else {
        return true;
    };
    let needle = term.to_lowercase();
    [
        &submission.name,
        &submission.email,
        &submission.subject,
        &submission.message,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Listing order: newest first, ties broken by descending id.
pub fn newest_first(a: &Submission, b: &Submission) -> Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

/// Escape `%`, `_` and `\` so a term can be embedded in an `ILIKE` pattern.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Id lists
// ---------------------------------------------------------------------------

/// Parse a comma-separated id list (`"1,2, 3"`). Duplicates are dropped,
/// first-seen order is kept. Empty segments are ignored.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let mut ids = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let id = token
            .parse::<DbId>()
            .map_err(|_| CoreError::Validation(format!("Invalid submission id '{token}'")))?;
        ids.push(id);
    }
    Ok(dedup_ids(ids))
}

/// Remove duplicate ids, keeping first-seen order.
pub fn dedup_ids(ids: Vec<DbId>) -> Vec<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Validate the id list of a bulk operation: non-empty and bounded.
pub fn validate_bulk_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(
            "ids must contain at least one submission id".into(),
        ));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(CoreError::Validation(format!(
            "ids must contain at most {MAX_BULK_IDS} submission ids"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
