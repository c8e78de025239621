//! Field validators
//!
//! Pure predicates over one field value. A validator never fails on
//! malformed input: an absent or null value is `FieldMissing`, a value of the
//! wrong type is `TypeMismatch` (except for ids, where anything that is not a
//! positive integer is `InvalidId`).

use super::types::{FieldCheck, Violation, ViolationCode};
use crate::stream::json_type_name;
use crate::types::JsonValue;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

fn missing(field: &str) -> Violation {
    Violation::new(
        ViolationCode::FieldMissing,
        field,
        format!("Missing required field: {field}"),
    )
}

fn mismatch(field: &str, expected: &str, value: &JsonValue) -> Violation {
    Violation::new(
        ViolationCode::TypeMismatch,
        field,
        format!(
            "Field {field} must be {expected}, got {}",
            json_type_name(value)
        ),
    )
}

/// Get a present, non-null value or report it missing
fn present<'a>(value: Option<&'a JsonValue>, field: &str) -> Result<&'a JsonValue, Violation> {
    match value {
        None | Some(JsonValue::Null) => Err(missing(field)),
        Some(v) => Ok(v),
    }
}

fn string<'a>(value: Option<&'a JsonValue>, field: &str) -> Result<&'a str, Violation> {
    let value = present(value, field)?;
    value.as_str().ok_or_else(|| mismatch(field, "a string", value))
}

/// Parse a positive integer id, or explain why it is not one
///
/// Any integer from 1 to `u64::MAX` is accepted.
pub fn positive_id(value: Option<&JsonValue>, field: &str) -> Result<u64, Violation> {
    let value = present(value, field)?;
    match value.as_u64() {
        Some(id) if id >= 1 => Ok(id),
        _ => Err(Violation::new(
            ViolationCode::InvalidId,
            field,
            format!("Field {field} must be a positive integer, got {value}"),
        )),
    }
}

/// Fails with `InvalidId` unless the value is an integer >= 1
pub fn positive_integer(value: Option<&JsonValue>, field: &str) -> FieldCheck {
    positive_id(value, field).map(|_| ())
}

/// Fails with `InvalidEmail` unless the value looks like `local@domain.tld`
pub fn email_format(value: Option<&JsonValue>, field: &str) -> FieldCheck {
    let email = string(value, field)?;
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(Violation::new(
            ViolationCode::InvalidEmail,
            field,
            format!("Invalid email format: '{email}'"),
        ))
    }
}

/// Fails with `TooShort` unless the value has at least `min` characters
pub fn min_length(value: Option<&JsonValue>, field: &str, min: usize) -> FieldCheck {
    let text = string(value, field)?;
    let len = text.chars().count();
    if len >= min {
        Ok(())
    } else {
        Err(Violation::new(
            ViolationCode::TooShort,
            field,
            format!("Field {field} must be at least {min} characters, got {len}"),
        ))
    }
}

/// Fails with `AllUppercase` when the value has letters and all are upper-case
pub fn not_all_uppercase(value: Option<&JsonValue>, field: &str) -> FieldCheck {
    let text = string(value, field)?;
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return Ok(());
    }
    if letters.all(char::is_uppercase) {
        Err(Violation::new(
            ViolationCode::AllUppercase,
            field,
            format!("Field {field} must not be entirely upper-case"),
        ))
    } else {
        Ok(())
    }
}

/// Fails with `MissingAddress` unless the value is a mapping with an entry
pub fn non_empty_mapping(value: Option<&JsonValue>, field: &str) -> FieldCheck {
    let value = present(value, field)?;
    match value {
        JsonValue::Object(map) if !map.is_empty() => Ok(()),
        JsonValue::Object(_) => Err(Violation::new(
            ViolationCode::MissingAddress,
            field,
            format!("Field {field} must not be empty"),
        )),
        other => Err(mismatch(field, "an object", other)),
    }
}
