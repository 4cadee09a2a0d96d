//! Calendar-day segmentation and Saturday premium overlap.
//!
//! Premium pay is a per-day, per-window concept, so every punch is first
//! split at local midnights. Each resulting segment carries the hours that
//! fall inside that Saturday's premium window.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SabbathPolicy;
use crate::models::{DailyBaseRow, EmployeeName, Punch, hours_between};

/// The part of a punch that falls on one calendar day.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::segment_punch;
/// use payroll_engine::config::SabbathPolicy;
/// use payroll_engine::models::{EmployeeName, Punch};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let punch = Punch::new(EmployeeName::new("Dana"), at("2024-01-05 22:00"), at("2024-01-06 02:00"));
///
/// let segments = segment_punch(&punch, &SabbathPolicy::default());
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].total_hours, Decimal::new(2, 0));
/// assert_eq!(segments[1].date.to_string(), "2024-01-06");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySegment {
    /// The employee who punched.
    pub employee: EmployeeName,
    /// The calendar day the segment lies on.
    pub date: NaiveDate,
    /// Segment start.
    pub start: NaiveDateTime,
    /// Segment end (exclusive).
    pub end: NaiveDateTime,
    /// Hours in the segment.
    pub total_hours: Decimal,
    /// Hours inside the Saturday premium window.
    pub sabbath150_hours: Decimal,
}

impl DaySegment {
    /// Hours outside the premium window, never negative.
    pub fn non_sabbath_hours(&self) -> Decimal {
        (self.total_hours - self.sabbath150_hours).max(Decimal::ZERO)
    }
}

/// True if a punch starting at `time_in` gets no Saturday premium at all.
fn is_evening_exempt(time_in: NaiveDateTime, policy: &SabbathPolicy) -> bool {
    time_in.weekday() == Weekday::Sat && time_in.time() >= policy.evening_exemption_from
}

/// Hours of `[start, end)` inside the premium window of `start`'s day.
fn sabbath_overlap(start: NaiveDateTime, end: NaiveDateTime, policy: &SabbathPolicy) -> Decimal {
    let day = start.date();
    if day.weekday() != Weekday::Sat {
        return Decimal::ZERO;
    }
    let window_start = day.and_time(policy.window_start);
    let window_end = day.and_time(policy.window_end);
    let from = start.max(window_start);
    let to = end.min(window_end);
    if to > from {
        hours_between(from, to)
    } else {
        Decimal::ZERO
    }
}

/// Splits a punch at local midnights.
///
/// The clock-out time is normalized first, so an out time at or before the in
/// time is read as the next day. Segments are returned in chronological order
/// and their hours sum to the punch's worked hours.
pub fn segment_punch(punch: &Punch, policy: &SabbathPolicy) -> Vec<DaySegment> {
    let punch_end = punch.normalized_out();
    let exempt = is_evening_exempt(punch.time_in, policy);
    let mut segments = Vec::new();
    let mut current_start = punch.time_in;

    while current_start < punch_end {
        let segment_end = current_start
            .date()
            .succ_opt()
            .map(|day| day.and_time(NaiveTime::default()))
            .map_or(punch_end, |next_midnight| next_midnight.min(punch_end));

        let total_hours = hours_between(current_start, segment_end);
        if total_hours > Decimal::ZERO {
            let sabbath150_hours = if exempt {
                Decimal::ZERO
            } else {
                sabbath_overlap(current_start, segment_end, policy)
            };
            segments.push(DaySegment {
                employee: punch.employee.clone(),
                date: current_start.date(),
                start: current_start,
                end: segment_end,
                total_hours,
                sabbath150_hours,
            });
        }

        current_start = segment_end;
    }

    segments
}

/// Builds one [`DailyBaseRow`] per employee and calendar date.
///
/// Segments of every punch are summed by `(employee, date)`. Rows come back
/// sorted by employee, then date.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::build_daily_base;
/// use payroll_engine::config::SabbathPolicy;
/// use payroll_engine::models::{EmployeeName, Punch};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let dana = EmployeeName::new("Dana");
/// let punches = vec![
///     Punch::new(dana.clone(), at("2024-01-07 08:00"), at("2024-01-07 12:00")),
///     Punch::new(dana.clone(), at("2024-01-07 13:00"), at("2024-01-07 17:30")),
/// ];
///
/// let rows = build_daily_base(&punches, &SabbathPolicy::default());
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].total_hours, Decimal::new(85, 1));
/// ```
pub fn build_daily_base(punches: &[Punch], policy: &SabbathPolicy) -> Vec<DailyBaseRow> {
    let mut days: BTreeMap<(EmployeeName, NaiveDate), DailyBaseRow> = BTreeMap::new();

    for punch in punches {
        for segment in segment_punch(punch, policy) {
            let non_sabbath = segment.non_sabbath_hours();
            let row = days
                .entry((segment.employee.clone(), segment.date))
                .or_insert_with(|| DailyBaseRow {
                    employee: segment.employee.clone(),
                    date: segment.date,
                    total_hours: Decimal::ZERO,
                    non_sabbath_hours: Decimal::ZERO,
                    sabbath150_hours: Decimal::ZERO,
                });
            row.total_hours += segment.total_hours;
            row.non_sabbath_hours += non_sabbath;
            row.sabbath150_hours += segment.sabbath150_hours;
        }
    }

    debug!(punches = punches.len(), days = days.len(), "Daily base built");
    days.into_values().collect()
}
