//! The dashboard controller.
//!
//! [`Dashboard`] owns the table state and drives every call to the
//! submissions API. At most one bulk action (export or delete) or table
//! reload runs at a time; a second trigger while one is in flight fails
//! with [`DashboardError::Busy`] and never reaches the API. A reload can
//! therefore never write rows back over a delete that finished under it.
//! The view lock is released before any API call is awaited.

use std::sync::atomic::{AtomicBool, Ordering};

use agency_core::submission::{Submission, SubmissionStatus};
use agency_core::types::DbId;
use tokio::sync::{Mutex, MutexGuard};

use crate::client::{CsvExport, SubmissionsApi};
use crate::error::{ApiError, DashboardError};
use crate::view::ListView;

/// Inline notification shown above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Blocking yes/no prompt shown before destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Where an exported CSV goes (browser download, file on disk, ...).
pub trait DownloadSink: Send + Sync {
    fn save(&self, export: &CsvExport) -> std::io::Result<()>;
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The operator dismissed the confirmation prompt.
    Cancelled,
    Deleted { count: u64 },
}

/// Clears the in-flight marker when the bulk action ends, including when
/// its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DashboardError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| DashboardError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Dashboard<A> {
    api: A,
    view: Mutex<ListView>,
    notice: Mutex<Option<Notice>>,
    detail: Mutex<Option<DbId>>,
    in_flight: AtomicBool,
}

impl<A: SubmissionsApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: Mutex::new(ListView::default()),
            notice: Mutex::new(None),
            detail: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Lock the table for reading or for selection changes.
    pub async fn view(&self) -> MutexGuard<'_, ListView> {
        self.view.lock().await
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.notice.lock().await.clone()
    }

    pub async fn dismiss_notice(&self) {
        *self.notice.lock().await = None;
    }

    /// Whether a bulk action is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn can_export(&self) -> bool {
        !self.is_busy() && self.view.lock().await.selected_count() > 0
    }

    pub async fn can_delete(&self) -> bool {
        self.can_export().await
    }

    /// Fetch the table contents under the current filter.
    ///
    /// Fails with [`DashboardError::Busy`] while a bulk action is in flight.
    pub async fn load(&self) -> Result<(), DashboardError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let filter = self.view.lock().await.filter().clone();
        match self.api.list(&filter).await {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "Loaded submissions");
                self.view.lock().await.replace_rows(rows);
                Ok(())
            }
            Err(e) => {
                self.fail(e.user_message()).await;
                Err(e.into())
            }
        }
    }

    // ---- bulk actions ----

    /// Export the selected rows and hand the file to `sink`. The selection
    /// is left as it was.
    pub async fn export_selected(&self, sink: &dyn DownloadSink) -> Result<(), DashboardError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let ids = self.selected_ids().await?;

        let export = match self.api.export(&ids).await {
            Ok(export) => export,
            Err(e) => {
                tracing::warn!(error = %e, selected = ids.len(), "Export failed");
                self.fail(format!("Export failed: {}", e.user_message())).await;
                return Err(e.into());
            }
        };

        if let Err(e) = sink.save(&export) {
            tracing::warn!(error = %e, filename = %export.filename, "Saving export failed");
            self.fail(format!("Could not save {}", export.filename)).await;
            return Err(e.into());
        }

        tracing::info!(selected = ids.len(), filename = %export.filename, "Exported submissions");
        Ok(())
    }

    /// Delete the selected rows after `confirm` agrees.
    ///
    /// On success the rows leave the table and the selection is cleared. On
    /// failure nothing is removed and the selection stays.
    pub async fn delete_selected(
        &self,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, DashboardError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let ids = self.selected_ids().await?;

        if !confirm.confirm(&delete_prompt(ids.len())) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let count = match self.api.bulk_delete(&ids).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, selected = ids.len(), "Bulk delete failed");
                self.fail(format!("Delete failed: {}", e.user_message())).await;
                return Err(e.into());
            }
        };

        {
            let mut view = self.view.lock().await;
            // Ids the server no longer had are gone too.
            view.remove_rows(&ids);
            view.cancel();
        }
        {
            let mut detail = self.detail.lock().await;
            if detail.is_some_and(|id| ids.contains(&id)) {
                *detail = None;
            }
        }

        tracing::info!(requested = ids.len(), deleted = count, "Bulk delete completed");
        *self.notice.lock().await = Some(Notice::Success(deleted_message(count)));
        Ok(DeleteOutcome::Deleted { count })
    }

    // ---- detail view ----

    /// The submission open in the detail view, if any.
    pub async fn detail(&self) -> Option<Submission> {
        let id = (*self.detail.lock().await)?;
        self.view
            .lock()
            .await
            .row(id)
            .map(|r| r.submission.clone())
    }

    /// Open the detail view with a fresh copy from the server.
    pub async fn open_detail(&self, id: DbId) -> Result<Submission, DashboardError> {
        let submission = self.refresh_with(self.api.get(id).await).await?;
        *self.detail.lock().await = Some(id);
        Ok(submission)
    }

    pub async fn close_detail(&self) {
        *self.detail.lock().await = None;
    }

    /// Delete one loaded submission (the detail view's delete button) after
    /// `confirm` agrees. The row leaves the table and, if it was open, the
    /// detail view closes.
    pub async fn delete_row(
        &self,
        id: DbId,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, DashboardError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        self.ensure_loaded(id).await?;

        if !confirm.confirm(&delete_prompt(1)) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.api.delete(id).await {
            tracing::warn!(error = %e, submission_id = id, "Delete failed");
            self.fail(format!("Delete failed: {}", e.user_message())).await;
            return Err(e.into());
        }

        self.view.lock().await.remove_rows(&[id]);
        {
            let mut detail = self.detail.lock().await;
            if *detail == Some(id) {
                *detail = None;
            }
        }

        tracing::info!(submission_id = id, "Submission deleted");
        *self.notice.lock().await = Some(Notice::Success(deleted_message(1)));
        Ok(DeleteOutcome::Deleted { count: 1 })
    }

    pub async fn set_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<Submission, DashboardError> {
        self.ensure_loaded(id).await?;
        self.refresh_with(self.api.update_status(id, status).await)
            .await
    }

    pub async fn save_notes(&self, id: DbId, notes: &str) -> Result<Submission, DashboardError> {
        self.ensure_loaded(id).await?;
        self.refresh_with(self.api.update_notes(id, notes).await)
            .await
    }

    // ---- private helpers ----

    async fn selected_ids(&self) -> Result<Vec<DbId>, DashboardError> {
        let ids = self.view.lock().await.selected_ids();
        if ids.is_empty() {
            return Err(DashboardError::NothingSelected);
        }
        Ok(ids)
    }

    async fn ensure_loaded(&self, id: DbId) -> Result<(), DashboardError> {
        if self.view.lock().await.row(id).is_none() {
            return Err(DashboardError::UnknownRow(id));
        }
        Ok(())
    }

    /// Write a server copy back into its row, or surface the failure.
    async fn refresh_with(
        &self,
        result: Result<Submission, ApiError>,
    ) -> Result<Submission, DashboardError> {
        match result {
            Ok(submission) => {
                self.view.lock().await.update_row(submission.clone());
                Ok(submission)
            }
            Err(e) => {
                self.fail(e.user_message()).await;
                Err(e.into())
            }
        }
    }

    async fn fail(&self, message: String) {
        *self.notice.lock().await = Some(Notice::Error(message));
    }
}

fn delete_prompt(n: usize) -> String {
    match n {
        1 => "Delete 1 selected submission? This cannot be undone.".to_string(),
        n => format!("Delete {n} selected submissions? This cannot be undone."),
    }
}

fn deleted_message(count: u64) -> String {
    match count {
        1 => "1 submission deleted".to_string(),
        n => format!("{n} submissions deleted"),
    }
}
