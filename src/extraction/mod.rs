//! Extraction of punches from decoded time-clock reports.
//!
//! Two strategies exist. The primary one ([`PunchExtractor`]) locates the
//! in/out columns from each block's header row. The fixed-column strategy
//! ([`extract_fixed_columns`]) handles the older kiosk layout in which the
//! clock-in and clock-out values always occupy the first two columns.

mod date_text;
mod fixed_columns;
mod punches;

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExtractionLabels;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeName, Punch, Table};

pub use date_text::{parse_cell, parse_date_text, serial_to_datetime};
pub use fixed_columns::extract_fixed_columns;
pub use punches::{HeaderColumns, PunchExtractor, extract_punches, report_title_employee};

/// Which extraction strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Header-driven scanning.
    #[default]
    Primary,
    /// First two columns hold the clock-in and clock-out values.
    FixedColumns,
    /// Header-driven scanning, falling back to fixed columns when it finds
    /// nothing.
    PrimaryThenFixedColumns,
}

/// Normalizes a caption for label comparison: lowercase with whitespace and
/// quote marks removed.
pub(crate) fn label_key(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '״' | '׳'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A set of caption synonyms compared by [`label_key`].
#[derive(Debug, Clone, Default)]
pub(crate) struct LabelSet {
    keys: Vec<String>,
}

impl LabelSet {
    pub(crate) fn new(labels: &[String]) -> Self {
        let keys = labels
            .iter()
            .map(|label| label_key(label))
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    /// True if any synonym occurs inside the text.
    pub(crate) fn contained_in(&self, text: &str) -> bool {
        let key = label_key(text);
        !key.is_empty() && self.keys.iter().any(|k| key.contains(k.as_str()))
    }

    /// True if the text starts with any synonym.
    pub(crate) fn prefixes(&self, text: &str) -> bool {
        let key = label_key(text);
        !key.is_empty() && self.keys.iter().any(|k| key.starts_with(k.as_str()))
    }
}

/// Collects punches in table order, keeping the first of any duplicates.
#[derive(Debug, Default)]
pub(crate) struct PunchCollector {
    seen: HashSet<(EmployeeName, NaiveDateTime, NaiveDateTime)>,
    punches: Vec<Punch>,
}

impl PunchCollector {
    pub(crate) fn push(&mut self, punch: Punch) {
        let key = (punch.employee.clone(), punch.time_in, punch.time_out);
        if self.seen.insert(key) {
            self.punches.push(punch);
        }
    }

    pub(crate) fn into_punches(self) -> Vec<Punch> {
        self.punches
    }
}

/// Runs the chosen strategy over a table.
///
/// Returns [`EngineError::NoPunchesFound`] if the strategy yields nothing.
pub fn extract(
    table: &Table,
    labels: &ExtractionLabels,
    strategy: ExtractionStrategy,
) -> EngineResult<Vec<Punch>> {
    let punches = match strategy {
        ExtractionStrategy::Primary => extract_punches(table, labels),
        ExtractionStrategy::FixedColumns => extract_fixed_columns(table, labels),
        ExtractionStrategy::PrimaryThenFixedColumns => {
            let primary = extract_punches(table, labels);
            if primary.is_empty() {
                info!("Primary extraction found nothing, trying fixed columns");
                extract_fixed_columns(table, labels)
            } else {
                primary
            }
        }
    };

    if punches.is_empty() {
        return Err(EngineError::NoPunchesFound);
    }
    Ok(punches)
}
