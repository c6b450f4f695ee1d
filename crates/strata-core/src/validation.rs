//! Validation utilities.

use crate::{FieldError, StrataError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `StrataError` on failure.
    fn validate_request(&self) -> Result<(), StrataError> {
        self.validate().map_err(validation_errors_to_strata_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `StrataError`.
#[must_use]
pub fn validation_errors_to_strata_error(errors: ValidationErrors) -> StrataError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    StrataError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank").with_message("must not be blank".into()));
        }
        Ok(())
    }

    /// Validates that a price is a finite, non-negative number.
    pub fn valid_price<P: std::borrow::Borrow<f64>>(price: P) -> Result<(), ValidationError> {
        let price: &f64 = price.borrow();
        if !price.is_finite() {
            return Err(ValidationError::new("price_not_finite").with_message("must be a finite number".into()));
        }
        if *price < 0.0 {
            return Err(ValidationError::new("price_negative").with_message("must not be negative".into()));
        }
        Ok(())
    }
}
