//! Date coercion policy.
//!
//! Record dates are optional while being edited but must never persist or
//! export as null: a missing or unparseable date becomes today's date. All
//! persistence and export paths go through [`coerce_date`]/[`effective_date`]
//! so stored and exported dates cannot diverge.

use chrono::{Local, NaiveDate};

/// Storage and export format for all record dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Lenient parse of a stored or user-entered date string.
///
/// Accepts `%Y-%m-%d`, or a timestamp with that prefix (some stores return
/// `2024-01-15T00:00:00`). Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
    })
}

/// Coerce a raw date value to a concrete date, substituting today for
/// missing or malformed input. The fallback is recovered silently; it is
/// logged rather than surfaced as an error.
pub fn coerce_date(raw: Option<&str>) -> NaiveDate {
    match raw {
        Some(s) => parse_date(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                tracing::warn!(value = s, "unparseable date, substituting today");
            }
            today()
        }),
        None => today(),
    }
}

/// The date a row persists and exports with: its own date, or today.
pub fn effective_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(today)
}

/// Render an optional date for storage, export, or display, applying the
/// default-to-today rule.
pub fn fmt_date(date: Option<NaiveDate>) -> String {
    effective_date(date).format(DATE_FORMAT).to_string()
}
