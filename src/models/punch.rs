//! Punch model.
//!
//! A punch is one clock-in/clock-out pair recorded by the time clock.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeName;

/// Calendar years a saved punch may fall in. Month keys carry four-digit years.
pub const PUNCH_YEARS: RangeInclusive<i32> = 1900..=9999;

/// Converts the span between two instants to hours.
pub(crate) fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let seconds = (end - start).num_seconds();
    Decimal::new(seconds, 0) / Decimal::new(3600, 0)
}

/// One recorded clock-in/clock-out pair for an employee.
///
/// The clock does not record dates separately for the two sides of a night
/// shift, so an out time at or before the in time means the shift crossed
/// midnight. [`Punch::normalized_out`] applies that rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Punch {
    /// The employee who punched.
    pub employee: EmployeeName,
    /// Clock-in time.
    pub time_in: NaiveDateTime,
    /// Clock-out time as recorded.
    pub time_out: NaiveDateTime,
}

impl Punch {
    /// Creates a punch.
    pub fn new(employee: EmployeeName, time_in: NaiveDateTime, time_out: NaiveDateTime) -> Self {
        Self {
            employee,
            time_in,
            time_out,
        }
    }

    /// Returns the clock-out time shifted a day forward when it is not after
    /// the clock-in time.
    ///
    /// At the end of the calendar, where no next day exists, the punch is
    /// read as empty and the clock-in time is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{EmployeeName, Punch};
    /// use chrono::NaiveDateTime;
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
    /// let punch = Punch::new(EmployeeName::new("Dana"), at("2024-01-05 22:00"), at("2024-01-05 02:00"));
    /// assert_eq!(punch.normalized_out(), at("2024-01-06 02:00"));
    /// ```
    pub fn normalized_out(&self) -> NaiveDateTime {
        if self.time_out <= self.time_in {
            self.time_out
                .checked_add_signed(Duration::hours(24))
                .unwrap_or(self.time_in)
        } else {
            self.time_out
        }
    }

    /// Returns the worked hours after midnight normalization.
    pub fn worked_hours(&self) -> Decimal {
        hours_between(self.time_in, self.normalized_out())
    }
}
