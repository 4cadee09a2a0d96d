//! Derived payroll rows.
//!
//! These are the outputs of the computation pipeline: per-day base rows,
//! overtime-weighted rows, per-employee summaries and the monthly
//! statement. None of them is persisted; they are recomputed from punches and
//! configuration on demand.

use std::ops::AddAssign;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeName, Extras, MonthKey, Punch};

/// Hours worked by one employee on one calendar date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{DailyBaseRow, EmployeeName};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let row = DailyBaseRow {
///     employee: EmployeeName::new("Dana"),
///     date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
///     total_hours: Decimal::new(9, 0),
///     non_sabbath_hours: Decimal::ZERO,
///     sabbath150_hours: Decimal::new(9, 0),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBaseRow {
    /// The employee.
    pub employee: EmployeeName,
    /// The calendar date.
    pub date: NaiveDate,
    /// All hours worked that day.
    pub total_hours: Decimal,
    /// Hours outside the Saturday premium window.
    pub non_sabbath_hours: Decimal,
    /// Hours inside the Saturday premium window.
    pub sabbath150_hours: Decimal,
}

/// A daily row split into overtime tiers and weighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRow {
    /// The underlying daily hours.
    #[serde(flatten)]
    pub base: DailyBaseRow,
    /// Hours at 100%.
    pub regular_hours: Decimal,
    /// Hours at 125%.
    pub overtime125_hours: Decimal,
    /// Hours at 150% from daily overtime.
    pub overtime150_hours: Decimal,
    /// Hours after applying every multiplier.
    pub weighted_hours: Decimal,
}

/// Column sums of hour buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourTotals {
    /// All hours worked.
    pub total_hours: Decimal,
    /// Hours at 100%.
    pub regular_hours: Decimal,
    /// Hours at 125%.
    pub overtime125_hours: Decimal,
    /// Hours at 150% from daily overtime.
    pub overtime150_hours: Decimal,
    /// Hours inside the Saturday premium window.
    pub sabbath150_hours: Decimal,
    /// Hours after applying every multiplier.
    pub weighted_hours: Decimal,
}

impl HourTotals {
    /// Adds one weighted day to the totals.
    pub fn add_row(&mut self, row: &WeightedRow) {
        self.total_hours += row.base.total_hours;
        self.regular_hours += row.regular_hours;
        self.overtime125_hours += row.overtime125_hours;
        self.overtime150_hours += row.overtime150_hours;
        self.sabbath150_hours += row.base.sabbath150_hours;
        self.weighted_hours += row.weighted_hours;
    }
}

impl AddAssign for HourTotals {
    fn add_assign(&mut self, rhs: HourTotals) {
        self.total_hours += rhs.total_hours;
        self.regular_hours += rhs.regular_hours;
        self.overtime125_hours += rhs.overtime125_hours;
        self.overtime150_hours += rhs.overtime150_hours;
        self.sabbath150_hours += rhs.sabbath150_hours;
        self.weighted_hours += rhs.weighted_hours;
    }
}

/// Per-employee rollup across every known day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// The employee.
    pub employee: EmployeeName,
    /// Summed hour buckets.
    #[serde(flatten)]
    pub hours: HourTotals,
    /// Weighted hours priced at the employee's rate.
    pub base_pay: Decimal,
    /// Summed extras.
    #[serde(flatten)]
    pub extras: Extras,
    /// `base_pay` plus the extras net.
    pub final_pay: Decimal,
}

/// Column sums over all summary rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Summed hour buckets.
    #[serde(flatten)]
    pub hours: HourTotals,
    /// Summed base pay.
    pub base_pay: Decimal,
    /// Summed extras.
    #[serde(flatten)]
    pub extras: Extras,
    /// Summed final pay.
    pub final_pay: Decimal,
}

/// One weighted day with its pay at the current rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPay {
    /// The weighted day.
    #[serde(flatten)]
    pub row: WeightedRow,
    /// `weighted_hours` times the hourly rate.
    pub pay: Decimal,
}

/// One employee's pay for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatement {
    /// The employee.
    pub employee: EmployeeName,
    /// The month.
    pub month: MonthKey,
    /// Hourly rate used for the statement.
    pub hourly_rate: Decimal,
    /// Weighted days of the month in date order.
    pub days: Vec<DayPay>,
    /// Punches starting in the month, in clock-in order.
    pub punches: Vec<Punch>,
    /// Sum of the days' weighted hours.
    pub weighted_hours: Decimal,
    /// Sum of the days' pay.
    pub base_pay: Decimal,
    /// Extras in effect for the month.
    pub extras: Extras,
    /// Net of the month's extras.
    pub extras_net: Decimal,
    /// `base_pay` plus `extras_net`.
    pub final_pay: Decimal,
}
