//! Calculation logic for the payroll engine.
//!
//! This module turns punches into pay: calendar-day segmentation with the
//! Saturday premium window, overtime tiers and weighting, per-employee
//! summaries, monthly statements, and the flat export records.

mod export;
mod overtime;
mod payroll;
mod segmentation;

pub use export::{DailyExportRow, SummaryExportRow, export_daily, export_summary};
pub use overtime::{apply_overtime, weight_row};
pub use payroll::{
    adjacent_employee, employees, monthly_statement, months_for_employee, summarize,
    summary_totals, weighted_rows,
};
pub use segmentation::{DaySegment, build_daily_base, segment_punch};
