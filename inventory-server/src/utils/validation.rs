//! Input validation helpers
//!
//! Payload structs carry `validator` rules; handlers run them through
//! [`validate_payload`] so every failure ends up in the same error shape.

use validator::Validate;

use crate::utils::{AppError, ErrorCode};

/// Entity names: component, server, brand, supplier, discount
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Run the derived rules of a payload
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(
            ErrorCode::RequiredField,
            field,
            format!("{field} must not be empty"),
        ));
    }
    if value.chars().count() > max_len {
        return Err(AppError::invalid_field(
            ErrorCode::ValidationFailed,
            field,
            format!("{field} is too long (max {max_len})"),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::invalid_field(
            ErrorCode::ValidationFailed,
            field,
            format!("{field} is too long (max {max_len})"),
        ));
    }
    Ok(())
}
