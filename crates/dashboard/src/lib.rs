//! Client-side logic of the submissions dashboard.
//!
//! - [`client`] -- the [`client::SubmissionsApi`] seam and its HTTP implementation.
//! - [`view`] -- rows, local filtering and the selection state machine.
//! - [`controller`] -- [`controller::Dashboard`], which drives bulk actions and
//!   detail edits against the API.
//! - [`form`] -- contact-form state with explicitly passed field accessors.

pub mod client;
pub mod controller;
pub mod error;
pub mod form;
pub mod view;

pub use client::{CsvExport, HttpSubmissionsClient, SubmissionsApi};
pub use controller::{Confirm, Dashboard, DeleteOutcome, DownloadSink, Notice};
pub use error::{ApiError, DashboardError};
pub use view::{ListView, Row, SelectionState};
