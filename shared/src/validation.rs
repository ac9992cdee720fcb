//! Validation utilities for Crop Advisory Platform inputs
//!
//! Caller-facing fields arrive as free text (form fields, CLI
//! arguments). The engine only requires numeric parseability.

use thiserror::Error;

/// Why a caller-supplied field was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field `{field}` must not be empty")]
    Empty { field: String },

    #[error("field `{field}` is not a valid number: `{value}`")]
    NotNumeric { field: String, value: String },
}

/// Parse a numeric form field, rejecting empty and non-finite input.
pub fn parse_numeric_field(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NotNumeric {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Normalize a season label for case-insensitive rule matching.
pub fn normalize_season(raw: &str) -> String {
    raw.trim().to_lowercase()
}
