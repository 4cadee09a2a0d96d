//! The working payroll session.
//!
//! A [`Session`] holds the punches, the employee directory and the view
//! state. Every report is derived from it on demand; nothing derived is
//! stored. Sessions persist as [`SessionSnapshot`]s.

mod lenient;
mod snapshot;
mod upgrade;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::calculation::{
    DailyExportRow, SummaryExportRow, employees, export_daily, export_summary, monthly_statement,
    months_for_employee, summarize, summary_totals, weighted_rows,
};
use crate::config::{ExtractionLabels, PayrollPolicy};
use crate::error::{EngineError, EngineResult};
use crate::extraction::{ExtractionStrategy, extract};
use crate::models::{
    EmployeeDirectory, EmployeeFilter, EmployeeName, MonthKey, MonthlyStatement, Punch,
    SummaryRow, SummaryTotals, Table, WeightedRow,
};

pub use snapshot::{CURRENT_SESSION_VERSION, PunchRecord, SESSION_KIND, SessionSnapshot, UiState};

/// Punches, pay configuration and view state for one payroll run.
///
/// Every employee with a punch has a directory entry.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::extraction::ExtractionStrategy;
/// use payroll_engine::models::{table_from_text, EmployeeName};
/// use payroll_engine::session::Session;
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// let table = table_from_text(&[
///     &["Report of work hours for Dana between 1/1/2024 and 31/1/2024"],
///     &["Time in", "Time out"],
///     &["07/01/2024 08:00", "07/01/2024 16:00"],
/// ]);
///
/// let mut session = Session::new();
/// session.import_table(&table, &policy.labels, ExtractionStrategy::Primary).unwrap();
/// session.directory_mut().set_rate(&EmployeeName::new("Dana"), Decimal::new(50, 0));
///
/// let summary = session.summary(&policy);
/// assert_eq!(summary[0].final_pay, Decimal::new(400, 0));
///
/// let restored = Session::from_json(&session.to_json_pretty().unwrap(), &policy).unwrap();
/// assert_eq!(restored, session);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    punches: Vec<Punch>,
    directory: EmployeeDirectory,
    employee_filter: EmployeeFilter,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts punches from a table and makes them the session's punches.
    ///
    /// Configuration for employees already known is kept. Returns the number
    /// of punches imported. If nothing is found the session is left as it
    /// was and [`EngineError::NoPunchesFound`] is returned.
    pub fn import_table(
        &mut self,
        table: &Table,
        labels: &ExtractionLabels,
        strategy: ExtractionStrategy,
    ) -> EngineResult<usize> {
        let punches = extract(table, labels, strategy)?;
        let count = punches.len();
        self.replace_punches(punches);
        info!(punches = count, employees = self.directory.len(), "Table imported");
        Ok(count)
    }

    /// Replaces every punch, creating configuration for new employees.
    pub fn replace_punches(&mut self, punches: Vec<Punch>) {
        self.punches = punches;
        for punch in &self.punches {
            self.directory.ensure(&punch.employee);
        }
    }

    /// Drops punches, configuration and view state.
    pub fn clear(&mut self) {
        self.punches.clear();
        self.directory.clear();
        self.employee_filter = EmployeeFilter::All;
    }

    /// The session's punches in import order.
    pub fn punches(&self) -> &[Punch] {
        &self.punches
    }

    /// The employee directory.
    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// Mutable access for mode, rate and extras edits.
    pub fn directory_mut(&mut self) -> &mut EmployeeDirectory {
        &mut self.directory
    }

    /// The employee selected for the daily view.
    pub fn employee_filter(&self) -> &EmployeeFilter {
        &self.employee_filter
    }

    /// Selects the employee for the daily view.
    ///
    /// Selecting an employee named `ALL` selects everyone, as that is how the
    /// selection is saved.
    pub fn set_employee_filter(&mut self, filter: EmployeeFilter) {
        self.employee_filter = filter.canonical();
    }

    /// Every employee with a punch, sorted.
    pub fn employees(&self) -> Vec<EmployeeName> {
        employees(&self.punches)
    }

    /// Months in which the employee clocked in.
    pub fn months_for_employee(&self, employee: &EmployeeName) -> Vec<MonthKey> {
        months_for_employee(&self.punches, employee)
    }

    /// Weighted days for every employee.
    pub fn weighted_rows(&self, policy: &PayrollPolicy) -> Vec<WeightedRow> {
        weighted_rows(&self.punches, &self.directory, policy)
    }

    /// One summary row per employee.
    pub fn summary(&self, policy: &PayrollPolicy) -> Vec<SummaryRow> {
        summarize(&self.weighted_rows(policy), &self.directory)
    }

    /// Summary rows with their column totals.
    pub fn summary_with_totals(&self, policy: &PayrollPolicy) -> (Vec<SummaryRow>, SummaryTotals) {
        let rows = self.summary(policy);
        let totals = summary_totals(&rows);
        (rows, totals)
    }

    /// One employee's statement for one month.
    pub fn monthly_statement(
        &self,
        employee: &EmployeeName,
        month: MonthKey,
        policy: &PayrollPolicy,
    ) -> MonthlyStatement {
        monthly_statement(&self.punches, &self.directory, employee, month, policy)
    }

    /// Per-day export for the given selection.
    pub fn export_daily(&self, filter: &EmployeeFilter, policy: &PayrollPolicy) -> Vec<DailyExportRow> {
        export_daily(&self.weighted_rows(policy), &self.directory, filter)
    }

    /// Per-employee export.
    pub fn export_summary(&self, policy: &PayrollPolicy) -> Vec<SummaryExportRow> {
        export_summary(&self.summary(policy))
    }

    /// Captures the session in the current snapshot layout.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            kind: SESSION_KIND.to_string(),
            version: CURRENT_SESSION_VERSION,
            saved_at: Some(Utc::now()),
            employee_config: self.directory.clone(),
            punches: self
                .punches
                .iter()
                .map(|p| PunchRecord {
                    employee: p.employee.clone(),
                    time_in: p.time_in,
                    time_out: p.time_out,
                })
                .collect(),
            ui: UiState {
                employee_filter: self.employee_filter.clone(),
            },
        }
    }

    /// Restores a session from a snapshot in the current layout.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mut session = Self {
            punches: Vec::new(),
            directory: snapshot.employee_config,
            employee_filter: snapshot.ui.employee_filter.canonical(),
        };
        session.replace_punches(
            snapshot
                .punches
                .into_iter()
                .map(|r| Punch::new(r.employee, r.time_in, r.time_out))
                .collect(),
        );
        session
    }

    /// Restores a session from saved JSON of any supported version.
    ///
    /// See [`SessionSnapshot::from_value`] for what is accepted and how the
    /// policy's clock zone and unidentified label apply.
    pub fn revive(value: Value, policy: &PayrollPolicy) -> EngineResult<Self> {
        SessionSnapshot::from_value(value, policy).map(Self::from_snapshot)
    }

    /// Parses and restores a saved session.
    pub fn from_json(text: &str, policy: &PayrollPolicy) -> EngineResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| EngineError::session_format(format!("invalid JSON: {e}")))?;
        Self::revive(value, policy)
    }

    /// Serializes the session as pretty-printed snapshot JSON.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| EngineError::session_format(e.to_string()))
    }
}
