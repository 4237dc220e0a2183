//! Public contact-form input and its validation.
//!
//! Error messages name the offending field and nothing else; they are
//! returned verbatim to anonymous callers of the contact endpoint.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of the `name` field in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of the `email` field (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Maximum length of the `subject` field.
pub const MAX_SUBJECT_LENGTH: usize = 300;

/// Maximum length of the `message` field.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Maximum length of operator notes.
pub const MAX_NOTES_LENGTH: usize = 10_000;

/// Body of `POST /api/contact`.
///
/// Fields default to empty so a missing field surfaces as "is required"
/// rather than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Check one field: required after trimming, bounded length.
pub fn validate_field(field: &'static str, value: &str, max_len: usize) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError {
            field,
            message: format!("{field} is required"),
        });
    }
    if trimmed.chars().count() > max_len {
        return Err(FieldError {
            field,
            message: format!("{field} must be at most {max_len} characters"),
        });
    }
    Ok(())
}

/// Collect every field error of a contact form, in form order.
pub fn field_errors(input: &ContactInput) -> Vec<FieldError> {
    [
        ("name", input.name.as_str(), MAX_NAME_LENGTH),
        ("email", input.email.as_str(), MAX_EMAIL_LENGTH),
        ("subject", input.subject.as_str(), MAX_SUBJECT_LENGTH),
        ("message", input.message.as_str(), MAX_MESSAGE_LENGTH),
    ]
    .into_iter()
    .filter_map(|(field, value, max)| validate_field(field, value, max).err())
    .collect()
}

/// Validate a contact form and return a trimmed copy.
///
/// Fails with [`CoreError::Validation`] carrying the first field error.
pub fn validate_contact(input: &ContactInput) -> Result<ContactInput, CoreError> {
    if let Some(first) = field_errors(input).into_iter().next() {
        return Err(CoreError::Validation(first.message));
    }
    Ok(ContactInput {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        subject: input.subject.trim().to_string(),
        message: input.message.trim().to_string(),
    })
}

/// Validate operator notes. Empty notes are allowed (clears the field).
pub fn validate_notes(notes: &str) -> Result<(), CoreError> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "notes must be at most {MAX_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}
