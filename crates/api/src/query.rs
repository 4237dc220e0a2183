//! Query parameter types for the submission endpoints.

use serde::Deserialize;

/// `GET /submissions?query=&status=&limit=&offset=`
///
/// Raw strings; converted to a typed filter in the handler so an invalid
/// status becomes a validation error rather than a query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub query: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /submissions/export?ids=1,2,3` or `?query=&status=`.
///
/// When `ids` is present the filter parameters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub ids: Option<String>,
    pub query: Option<String>,
    pub status: Option<String>,
}
