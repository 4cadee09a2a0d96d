//! Punch extraction from time-clock report tables.
//!
//! Kiosk exports contain one block per employee: a title row naming the
//! employee, a header row with clock-in and clock-out columns, the punch rows,
//! and a totals caption. Layouts vary between kiosk versions, so the scanner
//! is a small state machine driven by three guards:
//!
//! - [`PunchExtractor::title_match`] recognises the report title and yields the employee,
//! - [`PunchExtractor::header_match`] locates the in/out columns,
//! - [`PunchExtractor::stop_row_match`] recognises the end of a punch block.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::ExtractionLabels;
use crate::models::{Cell, EmployeeName, Punch, Table, collapse_text};

use super::date_text::parse_cell;
use super::{LabelSet, PunchCollector};

static REPORT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:דו.?ח.*שעות.*עבודה.*עבור|report\s+of\s+work\s+hours\s+for)\s+(.+?)\s+(?:בין|between)"#,
    )
    .expect("valid report title pattern")
});

/// Extracts the employee name from a report title, if the text is one.
///
/// # Examples
///
/// ```
/// use payroll_engine::extraction::report_title_employee;
///
/// let name = report_title_employee("דו\"ח שעות עבודה עבור דנה לוי בין 01/01/2024 ל 31/01/2024");
/// assert_eq!(name.unwrap().as_str(), "דנה לוי");
///
/// let name = report_title_employee("Report of work hours for Dana Levi between 1/1/2024 and 31/1/2024");
/// assert_eq!(name.unwrap().as_str(), "Dana Levi");
/// ```
pub fn report_title_employee(text: &str) -> Option<EmployeeName> {
    REPORT_TITLE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| EmployeeName::new(m.as_str()))
        .filter(|name| !name.is_empty())
}

/// Column positions captured from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColumns {
    /// Index of the clock-in column.
    pub time_in: usize,
    /// Index of the clock-out column.
    pub time_out: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingHeader,
    InTable(HeaderColumns),
}

/// The primary, header-driven extraction strategy.
#[derive(Debug, Clone)]
pub struct PunchExtractor<'a> {
    labels: &'a ExtractionLabels,
    time_in: LabelSet,
    time_out: LabelSet,
    totals: LabelSet,
    work_days: LabelSet,
    pay_percentage: LabelSet,
}

impl<'a> PunchExtractor<'a> {
    /// Creates an extractor for the given report vocabulary.
    pub fn new(labels: &'a ExtractionLabels) -> Self {
        Self {
            labels,
            time_in: LabelSet::new(&labels.time_in),
            time_out: LabelSet::new(&labels.time_out),
            totals: LabelSet::new(&labels.totals),
            work_days: LabelSet::new(&labels.work_days),
            pay_percentage: LabelSet::new(&labels.pay_percentage),
        }
    }

    /// Title guard: the employee named by a title cell.
    pub fn title_match(&self, first_cell: &str) -> Option<EmployeeName> {
        report_title_employee(first_cell)
    }

    /// Header guard: the in/out column positions, if the row is a header.
    pub fn header_match(&self, cells: &[String]) -> Option<HeaderColumns> {
        let time_in = cells.iter().position(|c| self.time_in.contained_in(c))?;
        let time_out = cells
            .iter()
            .enumerate()
            .position(|(i, c)| i != time_in && self.time_out.contained_in(c))?;
        Some(HeaderColumns { time_in, time_out })
    }

    /// Stop guard: true if the row ends the current punch block.
    pub fn stop_row_match(&self, cells: &[String]) -> bool {
        let joined = collapse_text(&cells.join(" "));
        if joined.is_empty() {
            return true;
        }
        let first = cells.first().map(String::as_str).unwrap_or_default();
        self.totals.prefixes(first)
            || self.work_days.prefixes(first)
            || self.pay_percentage.contained_in(&joined)
            || self.title_match(first).is_some()
    }

    /// Searches the rows above `index` for the nearest report title.
    fn employee_near(&self, rows: &[Vec<String>], index: usize) -> Option<EmployeeName> {
        let start = index.saturating_sub(self.labels.title_lookback_rows);
        rows[start..index]
            .iter()
            .rev()
            .find_map(|row| row.iter().find_map(|cell| self.title_match(cell)))
    }

    /// Scans the table and returns the deduplicated punches in table order.
    pub fn extract(&self, table: &Table) -> Vec<Punch> {
        let rows: Vec<Vec<String>> = table
            .iter()
            .map(|row| row.iter().map(|c| collapse_text(&c.as_text())).collect())
            .collect();
        let unidentified = EmployeeName::new(&self.labels.unidentified_label);

        let mut state = ScanState::SeekingHeader;
        let mut current: Option<EmployeeName> = None;
        let mut collector = PunchCollector::default();

        for (index, cells) in rows.iter().enumerate() {
            let first = cells.first().map(String::as_str).unwrap_or_default();
            if let Some(name) = self.title_match(first) {
                debug!(row = index, employee = %name, "Report title");
                current = Some(name);
                state = ScanState::SeekingHeader;
                continue;
            }

            match state {
                ScanState::SeekingHeader => {
                    if let Some(columns) = self.header_match(cells) {
                        debug!(
                            row = index,
                            time_in = columns.time_in,
                            time_out = columns.time_out,
                            "Punch table header"
                        );
                        if current.is_none() {
                            current = self.employee_near(&rows, index);
                        }
                        state = ScanState::InTable(columns);
                    }
                }
                ScanState::InTable(columns) => {
                    if self.stop_row_match(cells) {
                        debug!(row = index, "Punch table ended");
                        state = ScanState::SeekingHeader;
                        current = None;
                        continue;
                    }
                    let row = &table[index];
                    let time_in = row.get(columns.time_in).and_then(|c| self.parse(c));
                    let time_out = row.get(columns.time_out).and_then(|c| self.parse(c));
                    if let (Some(time_in), Some(time_out)) = (time_in, time_out) {
                        let employee = current
                            .clone()
                            .or_else(|| self.employee_near(&rows, index))
                            .unwrap_or_else(|| unidentified.clone());
                        collector.push(Punch::new(employee, time_in, time_out));
                    }
                }
            }
        }

        let punches = collector.into_punches();
        if punches.is_empty() {
            warn!(rows = rows.len(), "No punches found in table");
        } else {
            info!(rows = rows.len(), punches = punches.len(), "Punches parsed");
        }
        punches
    }

    fn parse(&self, cell: &Cell) -> Option<chrono::NaiveDateTime> {
        parse_cell(cell, &self.labels.serial_range)
    }
}

/// Extracts punches with the primary, header-driven strategy.
///
/// # Examples
///
/// ```
/// use payroll_engine::config::ExtractionLabels;
/// use payroll_engine::extraction::extract_punches;
/// use payroll_engine::models::table_from_text;
///
/// let table = table_from_text(&[
///     &["Report of work hours for Dana Levi between 1/1/2024 and 31/1/2024"],
///     &["Time in", "Time out", "Day"],
///     &["05/01/2024 08:00", "05/01/2024 16:00", "Fri"],
///     &["Total hours", "8:00"],
/// ]);
/// let punches = extract_punches(&table, &ExtractionLabels::default());
/// assert_eq!(punches.len(), 1);
/// assert_eq!(punches[0].employee.as_str(), "Dana Levi");
/// ```
pub fn extract_punches(table: &Table, labels: &ExtractionLabels) -> Vec<Punch> {
    PunchExtractor::new(labels).extract(table)
}
