//! Flat export records for the spreadsheet writer.
//!
//! Field order is the column order. Amounts are rounded to two decimal
//! places; the writer only formats.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{
    EmployeeDirectory, EmployeeFilter, EmployeeName, MonthKey, SummaryRow, WeightedRow,
};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One row of the per-day export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyExportRow {
    /// The employee.
    pub employee: EmployeeName,
    /// The calendar date.
    pub date: NaiveDate,
    /// All hours worked.
    pub total: Decimal,
    /// Hours at 100%.
    pub regular_100: Decimal,
    /// Hours at 125%.
    pub overtime_125: Decimal,
    /// Hours at 150% from daily overtime.
    pub overtime_150: Decimal,
    /// Hours inside the Saturday premium window.
    pub sabbath_150: Decimal,
    /// Hours after multipliers.
    pub weighted_hours: Decimal,
    /// Current hourly rate.
    pub hourly_rate: Decimal,
    /// Weighted hours times the rate.
    pub pay: Decimal,
    /// Travel allowance.
    pub travel: Decimal,
    /// Tips.
    pub tips: Decimal,
    /// Bonus.
    pub bonus: Decimal,
    /// Advance deducted.
    pub advance: Decimal,
    /// Pay plus extras net.
    pub final_pay: Decimal,
}

impl DailyExportRow {
    /// Column captions used by the kiosk's spreadsheet, in field order.
    pub const HEADERS: [&'static str; 15] = [
        "עובד",
        "תאריך",
        "סה\"כ שעות",
        "רגיל 100%",
        "נוספות 125%",
        "נוספות 150%",
        "שבת 150%",
        "שעות משוקללות",
        "שכר לשעה",
        "שכר יום",
        "נסיעות",
        "טיפים",
        "תוספת שכר",
        "החזר מקדמה",
        "שכר ברוטו",
    ];
}

/// One row of the per-employee export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryExportRow {
    /// The employee.
    pub employee: EmployeeName,
    /// All hours worked.
    pub total: Decimal,
    /// Hours at 100%.
    pub regular_100: Decimal,
    /// Hours at 125%.
    pub overtime_125: Decimal,
    /// Hours at 150% from daily overtime.
    pub overtime_150: Decimal,
    /// Hours inside the Saturday premium window.
    pub sabbath_150: Decimal,
    /// Hours after multipliers.
    pub weighted_hours: Decimal,
    /// Weighted hours priced at the rate.
    pub base_pay: Decimal,
    /// Travel allowance.
    pub travel: Decimal,
    /// Tips.
    pub tips: Decimal,
    /// Bonus.
    pub bonus: Decimal,
    /// Advance deducted.
    pub advance: Decimal,
    /// Pay plus extras net.
    pub final_pay: Decimal,
}

impl SummaryExportRow {
    /// Column captions used by the kiosk's spreadsheet, in field order.
    pub const HEADERS: [&'static str; 13] = [
        "עובד",
        "סה\"כ שעות",
        "רגיל 100%",
        "נוספות 125%",
        "נוספות 150%",
        "שבת 150%",
        "שעות משוקללות",
        "שכר בסיס",
        "נסיעות",
        "טיפים",
        "תוספת שכר",
        "החזר מקדמה",
        "שכר ברוטו",
    ];
}

/// Builds the per-day export for the employees passing `filter`.
///
/// Each day row carries the extras in effect for its month, and its final
/// pay is the day's pay plus that month's extras net. A month's extras
/// therefore appear once per day row of that month.
pub fn export_daily(
    rows: &[WeightedRow],
    directory: &EmployeeDirectory,
    filter: &EmployeeFilter,
) -> Vec<DailyExportRow> {
    rows.iter()
        .filter(|row| filter.matches(&row.base.employee))
        .map(|row| {
            let employee = &row.base.employee;
            let hourly_rate = directory.rate_of(employee);
            let pay = row.weighted_hours * hourly_rate;
            let extras = directory.extras_for_month(employee, MonthKey::of(row.base.date));
            DailyExportRow {
                employee: employee.clone(),
                date: row.base.date,
                total: round2(row.base.total_hours),
                regular_100: round2(row.regular_hours),
                overtime_125: round2(row.overtime125_hours),
                overtime_150: round2(row.overtime150_hours),
                sabbath_150: round2(row.base.sabbath150_hours),
                weighted_hours: round2(row.weighted_hours),
                hourly_rate,
                pay: round2(pay),
                travel: round2(extras.travel),
                tips: round2(extras.tips),
                bonus: round2(extras.bonus),
                advance: round2(extras.advance),
                final_pay: round2(pay + extras.net()),
            }
        })
        .collect()
}

/// Builds the per-employee export from summary rows.
pub fn export_summary(rows: &[SummaryRow]) -> Vec<SummaryExportRow> {
    rows.iter()
        .map(|row| SummaryExportRow {
            employee: row.employee.clone(),
            total: round2(row.hours.total_hours),
            regular_100: round2(row.hours.regular_hours),
            overtime_125: round2(row.hours.overtime125_hours),
            overtime_150: round2(row.hours.overtime150_hours),
            sabbath_150: round2(row.hours.sabbath150_hours),
            weighted_hours: round2(row.hours.weighted_hours),
            base_pay: round2(row.base_pay),
            travel: round2(row.extras.travel),
            tips: round2(row.extras.tips),
            bonus: round2(row.extras.bonus),
            advance: round2(row.extras.advance),
            final_pay: round2(row.final_pay),
        })
        .collect()
}
