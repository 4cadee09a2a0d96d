//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type has a
//! `Default` that encodes the standard kiosk payroll policy.

use chrono::NaiveTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::UNIDENTIFIED_EMPLOYEE;

/// Daily overtime tiers applied to non-Sabbath hours (mode A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Hours per day paid at the regular rate before overtime starts.
    pub regular_threshold_hours: Decimal,
    /// Width of the first overtime band, paid at the 125% multiplier.
    pub overtime_125_band_hours: Decimal,
    /// Multiplier for the first overtime band.
    pub overtime_125_multiplier: Decimal,
    /// Multiplier for overtime beyond the first band.
    pub overtime_150_multiplier: Decimal,
}

impl OvertimePolicy {
    /// Hours per day after which the 150% tier applies.
    pub fn overtime_150_threshold_hours(&self) -> Decimal {
        self.regular_threshold_hours + self.overtime_125_band_hours
    }
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            regular_threshold_hours: Decimal::new(9, 0),
            overtime_125_band_hours: Decimal::new(2, 0),
            overtime_125_multiplier: Decimal::new(125, 2),
            overtime_150_multiplier: Decimal::new(15, 1),
        }
    }
}

/// The Saturday daytime premium window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SabbathPolicy {
    /// Start of the premium window on Saturday.
    pub window_start: NaiveTime,
    /// End of the premium window on Saturday (exclusive).
    pub window_end: NaiveTime,
    /// Multiplier applied to hours inside the window.
    pub multiplier: Decimal,
    /// Punches starting on Saturday at or after this time earn no premium.
    pub evening_exemption_from: NaiveTime,
}

impl Default for SabbathPolicy {
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            window_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            multiplier: Decimal::new(15, 1),
            evening_exemption_from: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        }
    }
}

/// The time clock's local calendar.
///
/// Punches are wall-clock readings in this zone. Saved instants that carry
/// an offset (older sessions wrote UTC with a `Z` suffix) are converted into
/// it when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockPolicy {
    /// IANA zone of the kiosk, e.g. `Asia/Jerusalem`.
    pub time_zone: Tz,
}

impl Default for ClockPolicy {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Asia::Jerusalem,
        }
    }
}

/// Accepted range for numeric spreadsheet date serials.
///
/// Numbers outside the range are treated as ordinary numbers, not dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerialRange {
    /// Smallest accepted serial (inclusive).
    pub min: f64,
    /// Largest accepted serial (inclusive).
    pub max: f64,
}

impl SerialRange {
    /// Returns true if the value is a plausible date serial.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl Default for SerialRange {
    fn default() -> Self {
        Self {
            min: 20000.0,
            max: 60000.0,
        }
    }
}

/// Label synonym sets recognised in time-clock report tables.
///
/// Labels are compared after lowercasing and removing whitespace and quote
/// marks, so `סה"כ שעות` and `סהכ  שעות` are the same caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionLabels {
    /// Column headings for the clock-in column.
    pub time_in: Vec<String>,
    /// Column headings for the clock-out column.
    pub time_out: Vec<String>,
    /// Captions that open a totals row.
    pub totals: Vec<String>,
    /// Captions that open a "number of work days" row.
    pub work_days: Vec<String>,
    /// Captions that mark a pay-percentage breakdown anywhere in a row.
    pub pay_percentage: Vec<String>,
    /// How many rows above a header to search for a report title.
    pub title_lookback_rows: usize,
    /// Name given to punches with no resolvable employee.
    pub unidentified_label: String,
    /// Accepted spreadsheet serial range.
    #[serde(default)]
    pub serial_range: SerialRange,
}

impl Default for ExtractionLabels {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            time_in: owned(&["שעת הגעה", "כניסה", "time in", "clock in"]),
            time_out: owned(&["שעת עזיבה", "יציאה", "time out", "clock out"]),
            totals: owned(&["סה\"כ שעות", "total hours"]),
            work_days: owned(&["מספר ימי עבודה", "number of work days"]),
            pay_percentage: owned(&["אחוזי שכר", "pay percentage"]),
            title_lookback_rows: 10,
            unidentified_label: UNIDENTIFIED_EMPLOYEE.to_string(),
            serial_range: SerialRange::default(),
        }
    }
}

/// Contents of `policy.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Overtime tiers.
    pub overtime: OvertimePolicy,
    /// Saturday premium window.
    pub sabbath: SabbathPolicy,
    /// Local calendar, the standard kiosk zone when omitted.
    #[serde(default)]
    pub clock: ClockPolicy,
}

/// The complete payroll policy.
///
/// This struct aggregates all configuration loaded from the YAML files in a
/// policy directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollPolicy {
    /// Overtime tiers.
    pub overtime: OvertimePolicy,
    /// Saturday premium window.
    pub sabbath: SabbathPolicy,
    /// Local calendar.
    pub clock: ClockPolicy,
    /// Report table vocabulary.
    pub labels: ExtractionLabels,
}

impl PayrollPolicy {
    /// Creates a policy from its component parts.
    pub fn new(policy: PolicyFile, labels: ExtractionLabels) -> Self {
        Self {
            overtime: policy.overtime,
            sabbath: policy.sabbath,
            clock: policy.clock,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_overtime_tiers() {
        let overtime = OvertimePolicy::default();
        assert_eq!(overtime.regular_threshold_hours, dec("9"));
        assert_eq!(overtime.overtime_150_threshold_hours(), dec("11"));
        assert_eq!(overtime.overtime_125_multiplier, dec("1.25"));
        assert_eq!(overtime.overtime_150_multiplier, dec("1.5"));
    }

    #[test]
    fn test_default_sabbath_window() {
        let sabbath = SabbathPolicy::default();
        assert_eq!(sabbath.window_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(sabbath.window_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(
            sabbath.evening_exemption_from,
            NaiveTime::from_hms_opt(16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serial_range_bounds() {
        let range = SerialRange::default();
        assert!(range.contains(45000.5));
        assert!(range.contains(20000.0));
        assert!(!range.contains(19999.9));
        assert!(!range.contains(60000.1));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_policy_file_deserializes_from_yaml() {
        let yaml = r#"
overtime:
  regular_threshold_hours: 8
  overtime_125_band_hours: 2
  overtime_125_multiplier: 1.25
  overtime_150_multiplier: 1.5
sabbath:
  window_start: "08:00:00"
  window_end: "17:00:00"
  multiplier: 1.5
  evening_exemption_from: "16:00:00"
"#;
        let file: PolicyFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.overtime.regular_threshold_hours, dec("8"));
        assert_eq!(file.sabbath, SabbathPolicy::default());
        assert_eq!(file.clock.time_zone, chrono_tz::Asia::Jerusalem);
    }

    #[test]
    fn test_clock_zone_from_yaml() {
        let clock: ClockPolicy = serde_yaml::from_str("time_zone: Europe/London").unwrap();
        assert_eq!(clock.time_zone, chrono_tz::Europe::London);

        let result: Result<ClockPolicy, _> = serde_yaml::from_str("time_zone: Mars/Olympus");
        assert!(result.is_err());
    }
}
