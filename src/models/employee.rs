//! Employee name value type.
//!
//! Names arrive from report captions and session files with inconsistent
//! spacing and embedded direction marks. [`EmployeeName`] is the normalized
//! form used as the grouping key everywhere in the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label given to punches whose employee cannot be determined.
pub const UNIDENTIFIED_EMPLOYEE: &str = "לא מזוהה";

/// Returns true for Unicode bidirectional formatting characters.
pub(crate) fn is_bidi_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// Collapses whitespace runs (NBSP included) to one space, drops direction
/// marks and trims.
pub(crate) fn collapse_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !is_bidi_mark(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized employee name.
///
/// Two names that differ only in whitespace or direction marks compare equal.
/// Ordering is plain lexicographic order of the normalized text.
///
/// # Example
///
/// ```
/// use payroll_engine::models::EmployeeName;
///
/// let a = EmployeeName::new("  Dana\u{00A0}\u{200F}Levi ");
/// let b = EmployeeName::new("Dana Levi");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "Dana Levi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EmployeeName(String);

impl EmployeeName {
    /// Normalizes the raw text into an employee name.
    pub fn new(raw: &str) -> Self {
        Self(collapse_text(raw))
    }

    /// The sentinel name for unattributed punches.
    pub fn unidentified() -> Self {
        Self::new(UNIDENTIFIED_EMPLOYEE)
    }

    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing remained after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for EmployeeName {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for EmployeeName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<EmployeeName> for String {
    fn from(name: EmployeeName) -> Self {
        name.0
    }
}

impl fmt::Display for EmployeeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmployeeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
