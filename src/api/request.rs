//! Request types for the payroll engine API.
//!
//! Report requests carry the saved session they operate on as raw JSON, so
//! snapshots of any supported version can be posted as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::ExtractionStrategy;
use crate::models::{EmployeeFilter, EmployeeName, Table};

/// Request body for `POST /punches/extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// The decoded report table.
    pub table: Table,
    /// Extraction strategy, primary when omitted.
    #[serde(default)]
    pub strategy: ExtractionStrategy,
}

/// Request body for `POST /reports/daily`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportRequest {
    /// A saved session.
    pub session: Value,
    /// Employee selection; the session's saved selection when omitted.
    #[serde(default)]
    pub employee_filter: Option<EmployeeFilter>,
}

/// Request body for `POST /reports/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReportRequest {
    /// A saved session.
    pub session: Value,
}

/// Request body for `POST /reports/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReportRequest {
    /// A saved session.
    pub session: Value,
    /// The employee.
    pub employee: EmployeeName,
    /// Month as `YYYY-MM`.
    pub month: String,
}
