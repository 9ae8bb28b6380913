//! Boundary validation helpers shared by HTTP handlers.
//!
//! Failures become `invalid_request` errors whose `details` name the field,
//! the rejected value, and a stable validation code.

use std::str::FromStr;

use serde_json::{Value, json};

use crate::domain::Error;

/// Stable validation codes placed in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    EmptyValue,
    InvalidEmail,
    OutOfRange,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::EmptyValue => "empty_value",
            Self::InvalidEmail => "invalid_email",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn invalid_uuid_details(field: FieldName, index: Option<usize>, value: &str) -> Value {
    let mut details = json!({
        "field": field.as_str(),
        "value": value,
        "code": ValidationCode::InvalidUuid.as_str(),
    });
    if let (Some(index), Some(map)) = (index, details.as_object_mut()) {
        map.insert("index".to_owned(), json!(index));
    }
    details
}

/// Parse an identifier, reporting a malformed value against `field`.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        Error::invalid_request(format!("{} must be a valid UUID", field.as_str()))
            .with_details(invalid_uuid_details(field, None, value))
    })
}

/// Parse an identifier taken from element `index` of a list field.
pub(crate) fn parse_indexed_id<T: FromStr>(
    value: &str,
    field: FieldName,
    index: usize,
) -> Result<T, Error> {
    value.parse().map_err(|_| {
        Error::invalid_request(format!("{} must contain valid UUIDs", field.as_str()))
            .with_details(invalid_uuid_details(field, Some(index), value))
    })
}

/// Largest count a stored capacity column holds.
pub(crate) const MAX_COUNT: u32 = i32::MAX.unsigned_abs();

/// Check a count taken from element `index` of a list field.
pub(crate) fn check_indexed_count(value: u32, field: FieldName, index: usize) -> Result<u32, Error> {
    if value <= MAX_COUNT {
        return Ok(value);
    }
    Err(
        Error::invalid_request(format!("{} must not exceed {MAX_COUNT}", field.as_str()))
            .with_details(json!({
                "field": field.as_str(),
                "value": value,
                "index": index,
                "code": ValidationCode::OutOfRange.as_str(),
            })),
    )
}
