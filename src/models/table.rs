//! Raw input table.
//!
//! The spreadsheet decoder hands the engine a list of rows, each a list of
//! cells. Rows may be short and cells may be typed values rather than text.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One cell of a decoded report table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A blank cell.
    #[default]
    Empty,
    /// A boolean cell.
    Bool(bool),
    /// A raw numeric cell, possibly a spreadsheet date serial.
    Number(f64),
    /// Cell text.
    Text(String),
    /// A date value already decoded by the spreadsheet reader.
    #[serde(skip_deserializing)]
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Returns the cell as display text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Bool(b) => Cow::Owned(b.to_string()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(dt)
    }
}

/// A decoded report: ordered rows of ordered cells.
pub type Table = Vec<Vec<Cell>>;

/// Builds a table from rows of text cells.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{table_from_text, Cell};
///
/// let table = table_from_text(&[&["a", ""], &["b"]]);
/// assert_eq!(table[1][0], Cell::Text("b".to_string()));
/// ```
pub fn table_from_text(rows: &[&[&str]]) -> Table {
    rows.iter()
        .map(|row| row.iter().map(|cell| Cell::from(*cell)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_json_row() {
        let row: Vec<Cell> = serde_json::from_str(r#"["05/01/2024 08:00", 45296.5, null, true]"#).unwrap();
        assert_eq!(row[0], Cell::Text("05/01/2024 08:00".to_string()));
        assert_eq!(row[1], Cell::Number(45296.5));
        assert_eq!(row[2], Cell::Empty);
        assert_eq!(row[3], Cell::Bool(true));
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Cell::Empty.as_text(), "");
        assert_eq!(Cell::from("x").as_text(), "x");
        assert_eq!(Cell::Number(12.0).as_text(), "12");
    }
}
