//! Client-side checks run before anything is sent to the server.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use shared::domain::ContactDraft;
use thiserror::Error;

use crate::phone::is_canonical_phone;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    PhoneNumber,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::FullName, Field::Email, Field::PhoneNumber];

    pub fn invalid_message(self) -> &'static str {
        match self {
            Field::FullName => "Please enter a name.",
            Field::Email => "Please enter a valid email.",
            Field::PhoneNumber => "Please enter a valid phone number.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::FullName => "full_name",
            Field::Email => "email",
            Field::PhoneNumber => "phone_number",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fields: {}", describe(.errors))]
pub struct ClientValidationError {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_field(field: Field, value: &str) -> Option<FieldError> {
    let valid = match field {
        Field::FullName => !value.trim().is_empty(),
        Field::Email => EMAIL.is_match(value.trim()),
        Field::PhoneNumber => is_canonical_phone(value.trim()),
    };
    (!valid).then(|| FieldError {
        field,
        message: field.invalid_message(),
    })
}

pub fn validate_draft(draft: &ContactDraft) -> Result<(), ClientValidationError> {
    let errors: Vec<FieldError> = [
        (Field::FullName, draft.full_name.as_str()),
        (Field::Email, draft.email.as_str()),
        (Field::PhoneNumber, draft.phone_number.as_str()),
    ]
    .into_iter()
    .filter_map(|(field, value)| validate_field(field, value))
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientValidationError { errors })
    }
}
