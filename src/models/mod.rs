//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod employee_config;
mod filter;
mod month;
mod punch;
mod rows;
mod table;

pub use employee::{EmployeeName, UNIDENTIFIED_EMPLOYEE};
pub(crate) use employee::{collapse_text, is_bidi_mark};
pub use employee_config::{EmployeeConfig, EmployeeDirectory, Extras, OvertimeMode};
pub use filter::{ALL_EMPLOYEES, EmployeeFilter};
pub use month::MonthKey;
pub(crate) use punch::hours_between;
pub use punch::{PUNCH_YEARS, Punch};
pub use rows::{
    DailyBaseRow, DayPay, HourTotals, MonthlyStatement, SummaryRow, SummaryTotals, WeightedRow,
};
pub use table::{Cell, Table, table_from_text};
