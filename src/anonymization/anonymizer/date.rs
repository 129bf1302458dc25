//! Birth date shifting

use super::digest::digest_prefix_u32;
use chrono::{Datelike, Duration, NaiveDate};

/// Calendar format accepted for birth dates
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest shift applied in either direction, in days
pub const MAX_DAY_OFFSET: i64 = 30;

/// Signed day offset in `[-30, 30]` derived from a digest
pub fn day_offset(digest: &str) -> i64 {
    let span = (2 * MAX_DAY_OFFSET + 1) as u32;
    i64::from(digest_prefix_u32(digest) % span) - MAX_DAY_OFFSET
}

/// Shifts a `YYYY-MM-DD` date by the digest-derived offset, keeping the year
///
/// Returns `None` when the input does not parse as a calendar date.
pub fn shift_birth_date(original: &str, digest: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(original.trim(), BIRTH_DATE_FORMAT).ok()?;
    let mut shifted = date.checked_add_signed(Duration::days(day_offset(digest)))?;

    if shifted.year() != date.year() {
        // Crossing a year boundary only happens around New Year, never on Feb 29
        shifted = shifted.with_year(date.year()).unwrap_or(date);
    }

    Some(shifted.format(BIRTH_DATE_FORMAT).to_string())
}
