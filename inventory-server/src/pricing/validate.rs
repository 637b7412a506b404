//! Discount terms validation

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiscountType, MAX_AMOUNT};

/// The part of a discount that decides prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountTerms {
    pub discount_type: DiscountType,
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Check a discount before it is written.
///
/// Every failing field is reported; the error code is the one of the first
/// failure (name, then value, then dates).
pub fn validate_terms(name: &str, terms: &DiscountTerms) -> Result<(), AppError> {
    let mut failures: Vec<(ErrorCode, &'static str, String)> = Vec::new();

    if name.trim().is_empty() {
        failures.push((ErrorCode::RequiredField, "name", "name is required".into()));
    }

    if !terms.value.is_finite() || terms.value <= 0.0 {
        failures.push((
            ErrorCode::DiscountInvalidValue,
            "value",
            "value must be greater than 0".into(),
        ));
    } else if terms.discount_type == DiscountType::Percentage && terms.value > 100.0 {
        failures.push((
            ErrorCode::DiscountInvalidValue,
            "value",
            "percentage must be at most 100".into(),
        ));
    } else if terms.value > MAX_AMOUNT {
        failures.push((
            ErrorCode::DiscountInvalidValue,
            "value",
            format!("amount must be at most {MAX_AMOUNT}"),
        ));
    }

    if terms.end_date < terms.start_date {
        failures.push((
            ErrorCode::DiscountInvalidDateRange,
            "end_date",
            format!(
                "end_date {} is before start_date {}",
                terms.end_date, terms.start_date
            ),
        ));
    }

    let Some((code, _, message)) = failures.first() else {
        return Ok(());
    };

    let mut err = AppError::with_message(*code, message.clone());
    for (_, field, message) in failures {
        err = err.with_field_error(field, message);
    }
    Err(err)
}
