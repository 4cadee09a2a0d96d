//! Fixed-column extraction for the older kiosk layout.
//!
//! Each block is a title row, some preamble, a header row whose first or
//! second cell carries the clock-in caption, then punch rows with the
//! clock-in value in the first column and the clock-out value in the second.
//! A totals caption in either of the first two cells ends the block.

use tracing::{debug, info, warn};

use crate::config::ExtractionLabels;
use crate::models::{Cell, EmployeeName, Punch, Table, collapse_text};

use super::date_text::parse_cell;
use super::punches::report_title_employee;
use super::{LabelSet, PunchCollector};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Outside,
    AwaitingHeader(EmployeeName),
    Reading(EmployeeName),
}

fn leading_text(row: &[Cell], index: usize) -> String {
    row.get(index)
        .map(|c| collapse_text(&c.as_text()))
        .unwrap_or_default()
}

/// Extracts punches assuming clock-in in column A and clock-out in column B.
pub fn extract_fixed_columns(table: &Table, labels: &ExtractionLabels) -> Vec<Punch> {
    let time_in = LabelSet::new(&labels.time_in);
    let totals = LabelSet::new(&labels.totals);
    let either = |set: &LabelSet, a: &str, b: &str| set.contained_in(a) || set.contained_in(b);

    let mut block = Block::Outside;
    let mut collector = PunchCollector::default();

    for (index, row) in table.iter().enumerate() {
        let a = leading_text(row, 0);
        let b = leading_text(row, 1);

        if let Some(name) = report_title_employee(&a) {
            debug!(row = index, employee = %name, "Fixed-column block title");
            block = Block::AwaitingHeader(name);
            continue;
        }

        block = match block {
            Block::Outside => Block::Outside,
            Block::AwaitingHeader(name) if either(&time_in, &a, &b) => Block::Reading(name),
            Block::AwaitingHeader(name) => Block::AwaitingHeader(name),
            Block::Reading(_) if either(&totals, &a, &b) => {
                debug!(row = index, "Fixed-column block ended");
                Block::Outside
            }
            Block::Reading(name) => {
                let parsed_in = row.first().and_then(|c| parse_cell(c, &labels.serial_range));
                let parsed_out = row.get(1).and_then(|c| parse_cell(c, &labels.serial_range));
                if let (Some(t_in), Some(t_out)) = (parsed_in, parsed_out) {
                    collector.push(Punch::new(name.clone(), t_in, t_out));
                }
                Block::Reading(name)
            }
        };
    }

    let punches = collector.into_punches();
    if punches.is_empty() {
        warn!(rows = table.len(), "No punches found with fixed columns");
    } else {
        info!(rows = table.len(), punches = punches.len(), "Punches parsed with fixed columns");
    }
    punches
}
