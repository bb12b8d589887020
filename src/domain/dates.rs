//! Date handling for borrow, due, and return dates.
//!
//! All dates in the system are plain calendar days formatted `YYYY-MM-DD`.
//! There is no time of day and no timezone. Parsing is strict: chrono alone
//! accepts variations such as `2024-1-3`, so input is gated by a format
//! check first.

use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::Regex;

use crate::domain::Error;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("hardcoded pattern is valid"));

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` string into a comparable date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] unless the input matches `YYYY-MM-DD`
/// exactly and names a real calendar day.
pub fn parse_iso(value: &str) -> Result<NaiveDate, Error> {
    if !ISO_DATE.is_match(value) {
        return Err(Error::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

/// Advances `date` by `days` calendar days.
#[must_use]
pub fn plus_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .expect("date arithmetic stays far from the calendar bounds")
}
