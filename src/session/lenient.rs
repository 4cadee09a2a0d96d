//! Forgiving readers for values found in saved sessions.
//!
//! Session files were written by several releases and sometimes edited by
//! hand. Numbers may be JSON numbers, strings, blanks or garbage; all of them
//! read as a number, with zero standing in for anything unreadable.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::{Extras, OvertimeMode};

fn decimal_from_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Reads a number, yielding zero for anything that is not one.
///
/// Booleans read as one and zero.
pub(crate) fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => decimal_from_text(&n.to_string()).unwrap_or_default(),
        Value::String(s) => decimal_from_text(s).unwrap_or_default(),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Reads an extras record field by field.
pub(crate) fn coerce_extras(value: &Value) -> Extras {
    let field = |name: &str| value.get(name).map(coerce_decimal).unwrap_or_default();
    Extras::new(field("travel"), field("tips"), field("bonus"), field("advance"))
}

/// Reads an overtime mode, `A` unless the value names `B`.
pub(crate) fn coerce_mode(value: Option<&Value>) -> OvertimeMode {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

/// Parses a saved instant as wall-clock time in `zone`.
///
/// Instants without an offset are already wall-clock readings. Instants
/// carrying one (including `Z`) are converted into `zone` first.
pub(crate) fn parse_instant(text: &str, zone: Tz) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&zone).naive_local());
    }
    NaiveDateTime::from_str(text)
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").ok())
}
