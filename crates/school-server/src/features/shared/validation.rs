//! Shared validation utilities
//!
//! ```rust,ignore
//! use school_server::features::shared::validation::{validate_required, validate_email};
//!
//! validate_required("firstName", &command.first_name, 100)?;
//! validate_email("email", &command.email)?;
//! ```

use thiserror::Error;

/// Longest accepted value for short text fields such as names
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest accepted value for free text such as remarks or addresses
pub const MAX_TEXT_LENGTH: usize = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },
}

/// Non-blank text no longer than `max_length` characters
pub fn validate_required(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    if value.trim().is_empty() {
        return Err(FieldValidationError::Required { field });
    }
    validate_length(field, value, max_length)
}

pub fn validate_length(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    if value.chars().count() > max_length {
        return Err(FieldValidationError::TooLong { field, max_length });
    }
    Ok(())
}

pub fn validate_optional_length(
    field: &'static str,
    value: Option<&str>,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    match value {
        Some(v) => validate_length(field, v, max_length),
        None => Ok(()),
    }
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email(field: &'static str, value: &str) -> Result<(), FieldValidationError> {
    if value.trim().is_empty() {
        return Err(FieldValidationError::Required { field });
    }
    if !is_valid_email(value.trim()) {
        return Err(FieldValidationError::InvalidEmail { field });
    }
    Ok(())
}

/// Empty strings are treated as absent
pub fn validate_optional_email(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), FieldValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => validate_email(field, v),
        _ => Ok(()),
    }
}

pub fn validate_non_negative(field: &'static str, value: i64) -> Result<(), FieldValidationError> {
    if value < 0 {
        return Err(FieldValidationError::Negative { field });
    }
    Ok(())
}

pub fn validate_positive(field: &'static str, value: i64) -> Result<(), FieldValidationError> {
    if value <= 0 {
        return Err(FieldValidationError::NotPositive { field });
    }
    Ok(())
}

pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Trim and drop empty optional strings before they reach the database
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
