//! Employee selection used by the daily view and export.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EmployeeName;

/// Wire value meaning "every employee".
///
/// The name is reserved: an employee called `ALL` cannot be selected on its
/// own, and selecting it selects everyone.
pub const ALL_EMPLOYEES: &str = "ALL";

/// Which employees a daily view shows.
///
/// Serialized as the employee name, or `"ALL"`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{EmployeeFilter, EmployeeName};
///
/// let filter: EmployeeFilter = serde_json::from_str("\"Dana\"").unwrap();
/// assert!(filter.matches(&EmployeeName::new("Dana")));
/// assert!(!filter.matches(&EmployeeName::new("Avi")));
/// assert!(EmployeeFilter::All.matches(&EmployeeName::new("Avi")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeFilter {
    /// No filtering.
    #[default]
    All,
    /// Only this employee.
    Employee(EmployeeName),
}

impl EmployeeFilter {
    /// Selects one employee.
    ///
    /// A blank name or the reserved [`ALL_EMPLOYEES`] selects everyone.
    pub fn employee(name: EmployeeName) -> Self {
        if name.is_empty() || name.as_str() == ALL_EMPLOYEES {
            EmployeeFilter::All
        } else {
            EmployeeFilter::Employee(name)
        }
    }

    /// The filter as it reads back after being saved.
    pub fn canonical(self) -> Self {
        match self {
            EmployeeFilter::Employee(name) => Self::employee(name),
            EmployeeFilter::All => EmployeeFilter::All,
        }
    }

    /// Returns true if the employee passes the filter.
    pub fn matches(&self, employee: &EmployeeName) -> bool {
        match self {
            EmployeeFilter::All => true,
            EmployeeFilter::Employee(name) => name == employee,
        }
    }
}

impl From<String> for EmployeeFilter {
    fn from(raw: String) -> Self {
        Self::employee(EmployeeName::new(&raw))
    }
}

impl From<EmployeeFilter> for String {
    fn from(filter: EmployeeFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for EmployeeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeFilter::All => f.write_str(ALL_EMPLOYEES),
            EmployeeFilter::Employee(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel_and_blank_mean_everyone() {
        assert_eq!(EmployeeFilter::from("ALL".to_string()), EmployeeFilter::All);
        assert_eq!(EmployeeFilter::from("  ".to_string()), EmployeeFilter::All);
    }

    #[test]
    fn test_reserved_name_selects_everyone() {
        let reserved = EmployeeFilter::Employee(EmployeeName::new("ALL")).canonical();
        assert_eq!(reserved, EmployeeFilter::All);
        assert_eq!(EmployeeFilter::employee(EmployeeName::new("ALL")), EmployeeFilter::All);

        let dana = EmployeeFilter::Employee(EmployeeName::new("Dana"));
        assert_eq!(dana.clone().canonical(), dana);
    }

    #[test]
    fn test_name_is_normalized() {
        assert_eq!(
            EmployeeFilter::from(" Dana  Levi".to_string()),
            EmployeeFilter::Employee(EmployeeName::new("Dana Levi"))
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&EmployeeFilter::All).unwrap();
        assert_eq!(json, "\"ALL\"");
        let json =
            serde_json::to_string(&EmployeeFilter::Employee(EmployeeName::new("Dana"))).unwrap();
        assert_eq!(json, "\"Dana\"");
    }
}
