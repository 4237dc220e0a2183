//! CSV export of submissions.
//!
//! Column order and header names are part of the public contract; operators
//! import these files into spreadsheets and CRMs.

use crate::submission::{Location, Submission};
use crate::types::Timestamp;

/// Export columns, in order.
pub const CSV_COLUMNS: [&str; 11] = [
    "name",
    "email",
    "subject",
    "message",
    "status",
    "ipAddress",
    "city",
    "region",
    "country",
    "createdAt",
    "notes",
];

/// MIME type of the export response.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Render submissions as CSV. The header row is always present.
pub fn submissions_to_csv(submissions: &[Submission]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_COLUMNS.iter().copied());
    for s in submissions {
        let (city, region, country) = location_columns(&s.location);
        let created_at = s.created_at.to_rfc3339();
        push_record(
            &mut out,
            [
                s.name.as_str(),
                s.email.as_str(),
                s.subject.as_str(),
                s.message.as_str(),
                s.status.as_str(),
                s.ip_address.as_str(),
                city,
                region,
                country,
                created_at.as_str(),
                s.notes.as_str(),
            ],
        );
    }
    out
}

/// Download filename for an export generated at `now`.
pub fn export_filename(now: Timestamp) -> String {
    format!("submissions-{}.csv", now.format("%Y%m%d-%H%M%S"))
}

/// Sentinels are written to the `city` column; `region` and `country` stay
/// empty.
fn location_columns(location: &Location) -> (&str, &str, &str) {
    match location {
        Location::Resolved(geo) => (&geo.city, &geo.region, &geo.country),
        Location::Sentinel(sentinel) => (sentinel.as_str(), "", ""),
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

/// RFC 4180 quoting: wrap in quotes when the field contains a delimiter,
/// quote or line break; double embedded quotes.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
