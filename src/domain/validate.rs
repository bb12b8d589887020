//! Input validators.
//!
//! These run at the edges of the domain: the ledger validates every key
//! argument it receives, and the CLI uses [`require_int_ge_0`] as a clap
//! value parser so quantities arrive as proven non-negative integers.

use non_empty_string::NonEmptyString;

use crate::domain::Error;

/// Trims `value` and ensures it is not empty.
///
/// # Errors
///
/// Returns [`Error::EmptyField`] naming `field` if nothing remains after
/// trimming.
pub fn require_nonempty(value: &str, field: &'static str) -> Result<String, Error> {
    let trimmed = value.trim();
    NonEmptyString::new(trimmed.to_string())
        .map(|s| s.as_str().to_string())
        .map_err(|_| Error::EmptyField { field })
}

/// Parses `value` as a non-negative integer.
///
/// # Errors
///
/// Returns [`Error::NotAnInteger`] if the trimmed input does not parse as a
/// decimal integer, or [`Error::NegativeInteger`] if it is below zero.
pub fn require_int_ge_0(value: &str, field: &'static str) -> Result<u32, Error> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| Error::NotAnInteger { field })?;

    u32::try_from(parsed).map_err(|_| {
        if parsed < 0 {
            Error::NegativeInteger { field }
        } else {
            Error::NotAnInteger { field }
        }
    })
}
