//! Date-time parsing for report cells.
//!
//! Only two textual shapes are accepted: day-first `D/M/YYYY H:MM[:SS]` and
//! ISO-like `YYYY-MM-DD[ T]H:MM[:SS]`. Anything else is rejected rather than
//! guessed at, because locale-dependent strings such as `03/04/2024` would
//! otherwise be misread silently.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::config::SerialRange;
use crate::models::{Cell, is_bidi_mark};

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/.](\d{1,2})[/.](\d{4})\s+(\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .expect("valid day-first pattern")
});

static ISO_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\s+|t)(\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .expect("valid ISO pattern")
});

/// Day zero of the spreadsheet serial calendar.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn field(caps: &Captures<'_>, index: usize) -> Option<u32> {
    match caps.get(index) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

fn build(year: u32, month: u32, day: u32, caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(
        field(caps, 4)?,
        field(caps, 5)?,
        field(caps, 6)?,
    )
}

/// Parses cell text in one of the two accepted shapes.
///
/// Direction marks and non-breaking spaces are removed first. Impossible
/// calendar values such as 31/02 yield `None`.
///
/// # Examples
///
/// ```
/// use payroll_engine::extraction::parse_date_text;
/// use chrono::NaiveDateTime;
///
/// let expected = NaiveDateTime::parse_from_str("2024-01-05 22:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(parse_date_text("5/1/2024 22:00"), Some(expected));
/// assert_eq!(parse_date_text("2024-01-05T22:00"), Some(expected));
/// assert_eq!(parse_date_text("Jan 5 2024 10pm"), None);
/// ```
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let cleaned: String = text
        .chars()
        .filter(|c| !is_bidi_mark(*c))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if let Some(caps) = DAY_FIRST.captures(cleaned) {
        return build(field(&caps, 3)?, field(&caps, 2)?, field(&caps, 1)?, &caps);
    }
    if let Some(caps) = ISO_LIKE.captures(cleaned) {
        return build(field(&caps, 1)?, field(&caps, 2)?, field(&caps, 3)?, &caps);
    }
    None
}

/// Converts a spreadsheet date serial to a wall-clock instant.
///
/// The integer part counts days from 1899-12-30 and the fraction is the time
/// of day, rounded to the millisecond. Values outside `range` are not dates.
pub fn serial_to_datetime(value: f64, range: &SerialRange) -> Option<NaiveDateTime> {
    if !range.contains(value) {
        return None;
    }
    let millis = (value * 86_400_000.0).round() as i64;
    serial_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Parses a table cell into an instant.
///
/// Decoded date cells pass through unchanged, numbers are read as date
/// serials and text goes through [`parse_date_text`].
pub fn parse_cell(cell: &Cell, range: &SerialRange) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => serial_to_datetime(*n, range),
        Cell::Text(s) => parse_date_text(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}
