//! Helper functions for parsing HL7 date and timestamp fields.
//!
//! Instruments transmit timestamps in a fixed per-category layout
//! (`yyyyMMdd`, `yyyyMMddHHmmss`, ...). Parsing is lenient: fractional
//! seconds and timezone offsets are trimmed, and any value that still does
//! not match the expected layout yields `None` so that the rest of the
//! owning entity can be populated.

use chrono::{NaiveDate, NaiveDateTime};

/// Parses a date against the category's format string.
///
/// Formats that include a time-of-day (`%H`) are parsed as full
/// timestamps and truncated to their date part, for instruments that
/// report dates of birth with time included.
pub fn date(value: &str, format: &str) -> Option<NaiveDate> {
    let cleaned = clean(value)?;
    if format.contains("%H") {
        NaiveDateTime::parse_from_str(cleaned, format)
            .ok()
            .map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(cleaned, format).ok()
    }
}

/// Parses a timestamp against the category's format string.
pub fn datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(clean(value)?, format).ok()
}

/// Trims whitespace, fractional seconds and timezone offsets.
fn clean(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let end = trimmed
        .find(['.', '+', '-'])
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    Some(&trimmed[..end])
}
