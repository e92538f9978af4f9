//! Input validation primitives.

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a slice to hold exactly one element.
pub fn require_exactly_one<'a, T>(
    values: &'a [T],
    field: &str,
    message: &str,
    hints: Vec<String>,
) -> Result<&'a T> {
    match values {
        [only] => Ok(only),
        _ => Err(Error::validation_invalid_argument(field, message, Some(hints))),
    }
}
