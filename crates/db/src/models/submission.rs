//! Submission row model and location column mapping.

use agency_core::submission::{
    GeoLocation, Location, LocationSentinel, Submission, SubmissionStatus,
};
use agency_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::StoreError;

pub const LOCATION_RESOLVED: &str = "resolved";
pub const LOCATION_LOCAL: &str = "local";
pub const LOCATION_UNKNOWN: &str = "unknown";

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub ip_address: String,
    pub location_kind: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub notes: String,
    pub created_at: Timestamp,
}

/// Flattened location columns for inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationColumns<'a> {
    pub kind: &'static str,
    pub city: Option<&'a str>,
    pub region: Option<&'a str>,
    pub country: Option<&'a str>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl<'a> From<&'a Location> for LocationColumns<'a> {
    fn from(location: &'a Location) -> Self {
        match location {
            Location::Resolved(geo) => LocationColumns {
                kind: LOCATION_RESOLVED,
                city: Some(&geo.city),
                region: Some(&geo.region),
                country: Some(&geo.country),
                lat: Some(geo.lat),
                lng: Some(geo.lng),
            },
            Location::Sentinel(sentinel) => LocationColumns {
                kind: match sentinel {
                    LocationSentinel::Local => LOCATION_LOCAL,
                    LocationSentinel::Unknown => LOCATION_UNKNOWN,
                },
                city: None,
                region: None,
                country: None,
                lat: None,
                lng: None,
            },
        }
    }
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StoreError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |reason: String| StoreError::Corrupt { id, reason };

        let status = SubmissionStatus::parse(&row.status).map_err(|e| corrupt(e.to_string()))?;

        let location = match row.location_kind.as_str() {
            LOCATION_LOCAL => Location::local(),
            LOCATION_UNKNOWN => Location::unknown(),
            LOCATION_RESOLVED => match (&row.city, &row.region, &row.country, row.lat, row.lng) {
                (Some(city), Some(region), Some(country), Some(lat), Some(lng)) => {
                    Location::Resolved(GeoLocation {
                        city: city.clone(),
                        region: region.clone(),
                        country: country.clone(),
                        lat,
                        lng,
                    })
                }
                _ => return Err(corrupt("resolved location with missing columns".into())),
            },
            other => return Err(corrupt(format!("unknown location kind '{other}'"))),
        };

        Ok(Submission {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status,
            ip_address: row.ip_address,
            location,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
