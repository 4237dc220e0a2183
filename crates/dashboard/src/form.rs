//! Contact-form state.
//!
//! [`ContactFormState`] is the single owner of field values and errors.
//! Field components never look the state up themselves: the parent hands
//! each one a [`FieldAccess`] for its own field.

use std::collections::BTreeMap;

use agency_core::contact::{
    field_errors, validate_contact, validate_field, ContactInput, MAX_EMAIL_LENGTH,
    MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, MAX_SUBJECT_LENGTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    fn max_len(self) -> usize {
        match self {
            Field::Name => MAX_NAME_LENGTH,
            Field::Email => MAX_EMAIL_LENGTH,
            Field::Subject => MAX_SUBJECT_LENGTH,
            Field::Message => MAX_MESSAGE_LENGTH,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormState {
    values: ContactInput,
    errors: BTreeMap<Field, String>,
}

impl ContactFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accessor handed to the component rendering `field`.
    pub fn field(&mut self, field: Field) -> FieldAccess<'_> {
        FieldAccess { field, form: self }
    }

    pub fn values(&self) -> &ContactInput {
        &self.values
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Validate every field. On success returns the trimmed input ready to
    /// post; on failure the per-field errors are recorded and returned.
    pub fn submit(&mut self) -> Result<ContactInput, Vec<(Field, String)>> {
        self.errors = field_errors(&self.values)
            .into_iter()
            .filter_map(|e| Field::from_name(e.field).map(|f| (f, e.message)))
            .collect();
        if self.has_errors() {
            return Err(self
                .errors
                .iter()
                .map(|(f, m)| (*f, m.clone()))
                .collect());
        }
        validate_contact(&self.values).map_err(|e| vec![(Field::Message, e.to_string())])
    }

    /// Clear values and errors after a successful post.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.values.name,
            Field::Email => &mut self.values.email,
            Field::Subject => &mut self.values.subject,
            Field::Message => &mut self.values.message,
        }
    }
}

/// Read/write handle for one field of a [`ContactFormState`].
pub struct FieldAccess<'a> {
    field: Field,
    form: &'a mut ContactFormState,
}

impl FieldAccess<'_> {
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn value(&self) -> &str {
        match self.field {
            Field::Name => &self.form.values.name,
            Field::Email => &self.form.values.email,
            Field::Subject => &self.form.values.subject,
            Field::Message => &self.form.values.message,
        }
    }

    /// Set the value. A pending error on this field is cleared.
    pub fn set_value(&mut self, value: impl Into<String>) {
        *self.form.slot(self.field) = value.into();
        self.form.errors.remove(&self.field);
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error(self.field)
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form.errors.insert(self.field, message.into());
    }

    /// Validate this field alone (on blur). Returns whether it is valid.
    pub fn validate(&mut self) -> bool {
        match validate_field(self.field.as_str(), self.value(), self.field.max_len()) {
            Ok(()) => {
                self.form.errors.remove(&self.field);
                true
            }
            Err(e) => {
                self.set_error(e.message);
                false
            }
        }
    }
}
