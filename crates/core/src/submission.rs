//! Contact submission entity, its status lifecycle and location metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Operator-managed lifecycle status of a submission.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    New,
    Contacted,
    Quoted,
    Closed,
}

impl SubmissionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::New,
        SubmissionStatus::Contacted,
        SubmissionStatus::Quoted,
        SubmissionStatus::Closed,
    ];

    /// Database and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::Contacted => "contacted",
            SubmissionStatus::Quoted => "quoted",
            SubmissionStatus::Closed => "closed",
        }
    }

    /// Parse a status label. Leading/trailing whitespace and case are ignored.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{}'. Must be one of: new, contacted, quoted, closed",
                    value.trim()
                ))
            })
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A resolved geolocation for a routable client address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// Placeholder used when a real geolocation cannot or should not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSentinel {
    /// The client address is private, loopback or otherwise non-routable.
    Local,
    /// The lookup failed, timed out, or no client address was available.
    Unknown,
}

impl LocationSentinel {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationSentinel::Local => "Local",
            LocationSentinel::Unknown => "Unknown",
        }
    }
}

/// Location attached to every submission. Never absent.
///
/// Serializes as the bare string `"Local"` / `"Unknown"` for sentinels and
/// as an object for resolved locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Resolved(GeoLocation),
    Sentinel(LocationSentinel),
}

impl Location {
    pub fn local() -> Self {
        Location::Sentinel(LocationSentinel::Local)
    }

    pub fn unknown() -> Self {
        Location::Sentinel(LocationSentinel::Unknown)
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Location::Sentinel(_))
    }

    /// The sentinel label, or `None` for a resolved location.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Location::Sentinel(s) => Some(s.as_str()),
            Location::Resolved(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One stored contact-form entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: SubmissionStatus,
    pub ip_address: String,
    pub location: Location,
    pub notes: String,
    pub created_at: Timestamp,
}

/// Everything needed to persist a new submission. The store assigns `id`,
/// `created_at`, the default status and empty notes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub ip_address: String,
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
