//! The saved-session wire format.
//!
//! [`SessionSnapshot`] is the current layout. [`SessionSnapshot::from_value`]
//! accepts every earlier layout as well: it checks the format tag, runs the
//! upgrade chain and then reads the upgraded JSON leniently.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeeConfig, EmployeeDirectory, EmployeeFilter, EmployeeName, MonthKey, PUNCH_YEARS,
};

use super::lenient::{coerce_decimal, coerce_extras, coerce_mode, parse_instant};
use super::upgrade::{UNVERSIONED, upgrade};

/// Format tag identifying a saved session.
pub const SESSION_KIND: &str = "payroll-session";

/// Layout version written by this build.
pub const CURRENT_SESSION_VERSION: u64 = 8;

/// One saved punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// The employee.
    pub employee: EmployeeName,
    /// Clock-in time.
    #[serde(rename = "timeInISO")]
    pub time_in: NaiveDateTime,
    /// Clock-out time as recorded.
    #[serde(rename = "timeOutISO")]
    pub time_out: NaiveDateTime,
}

/// Saved view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Employee selected in the daily view.
    #[serde(default)]
    pub employee_filter: EmployeeFilter,
}

/// A saved session in the current layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Always [`SESSION_KIND`].
    #[serde(rename = "__kind")]
    pub kind: String,
    /// Layout version.
    pub version: u64,
    /// When the snapshot was taken.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    /// Pay configuration per employee.
    pub employee_config: EmployeeDirectory,
    /// Every punch.
    pub punches: Vec<PunchRecord>,
    /// View state.
    #[serde(default)]
    pub ui: UiState,
}

fn read_version(root: &Map<String, Value>) -> EngineResult<u64> {
    let version = match root.get("version") {
        None | Some(Value::Null) => UNVERSIONED,
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0 && *v >= 0.0).map(|v| v as u64))
            .ok_or_else(|| EngineError::session_format(format!("invalid version {n}")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| EngineError::session_format(format!("invalid version '{s}'")))?,
        Some(other) => {
            return Err(EngineError::session_format(format!("invalid version {other}")));
        }
    };
    if version > CURRENT_SESSION_VERSION {
        return Err(EngineError::UnsupportedSessionVersion {
            version,
            supported: CURRENT_SESSION_VERSION,
        });
    }
    Ok(version)
}

fn read_config(name: &str, value: &Value) -> EmployeeConfig {
    let mut config = EmployeeConfig {
        mode: coerce_mode(value.get("mode")),
        hourly_rate: value.get("rate").map(coerce_decimal).unwrap_or_default(),
        ..EmployeeConfig::default()
    };

    if let Some(extras) = value.get("extras").and_then(Value::as_object) {
        for (key, entry) in extras {
            if entry.is_null() {
                continue;
            }
            match key.parse::<MonthKey>() {
                Ok(month) => {
                    config.extras.insert(month, coerce_extras(entry));
                }
                Err(_) => warn!(employee = name, key = %key, "Skipping extras with invalid month key"),
            }
        }
    }

    config.default_extras = value
        .get("defaultExtras")
        .filter(|v| v.is_object())
        .map(coerce_extras);
    config
}

fn read_instant(
    punch: &Map<String, Value>,
    field: &str,
    index: usize,
    zone: Tz,
) -> EngineResult<NaiveDateTime> {
    let instant = punch
        .get(field)
        .and_then(Value::as_str)
        .and_then(|text| parse_instant(text, zone))
        .ok_or_else(|| {
            EngineError::session_format(format!("punch {index} has no valid {field}"))
        })?;
    if !PUNCH_YEARS.contains(&instant.year()) {
        return Err(EngineError::session_format(format!(
            "punch {index} {field} {instant} is outside years {}-{}",
            PUNCH_YEARS.start(),
            PUNCH_YEARS.end()
        )));
    }
    Ok(instant)
}

fn read_punches(entries: &[Value], policy: &PayrollPolicy) -> EngineResult<Vec<PunchRecord>> {
    let zone = policy.clock.time_zone;
    let unidentified = EmployeeName::new(&policy.labels.unidentified_label);
    let mut punches = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(punch) = entry.as_object() else {
            if entry.is_null() {
                continue;
            }
            return Err(EngineError::session_format(format!("punch {index} is not an object")));
        };
        let employee = punch
            .get("employee")
            .and_then(Value::as_str)
            .map(EmployeeName::new)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| unidentified.clone());
        punches.push(PunchRecord {
            employee,
            time_in: read_instant(punch, "timeInISO", index, zone)?,
            time_out: read_instant(punch, "timeOutISO", index, zone)?,
        });
    }
    Ok(punches)
}

impl SessionSnapshot {
    /// Reads a saved session of any supported version.
    ///
    /// The format tag must be [`SESSION_KIND`] and `punches` must be an array;
    /// otherwise this fails with [`EngineError::SessionFormat`]. Numbers that
    /// cannot be read become zero, unknown modes become `A`, and extras under
    /// keys that are not months are dropped. A punch whose times cannot be
    /// read, or fall outside [`PUNCH_YEARS`], fails the whole snapshot.
    ///
    /// Instants saved with an offset are converted to the policy's clock zone.
    /// Punches without an employee get the policy's unidentified label.
    pub fn from_value(value: Value, policy: &PayrollPolicy) -> EngineResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(EngineError::session_format("snapshot is not an object"));
        };
        if root.get("__kind").and_then(Value::as_str) != Some(SESSION_KIND) {
            return Err(EngineError::session_format(format!(
                "missing or unknown __kind (expected '{SESSION_KIND}')"
            )));
        }
        if !root.get("punches").is_some_and(Value::is_array) {
            return Err(EngineError::session_format("punches must be an array"));
        }

        let from_version = read_version(&root)?;
        upgrade(&mut root, from_version);

        let mut employee_config = EmployeeDirectory::new();
        if let Some(configs) = root.get("employeeConfig").and_then(Value::as_object) {
            for (name, value) in configs {
                let employee = EmployeeName::new(name);
                if employee.is_empty() || !value.is_object() {
                    continue;
                }
                employee_config.insert(employee, read_config(name, value));
            }
        }

        let entries = root
            .get("punches")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let punches = read_punches(entries, policy)?;

        let employee_filter = root
            .get("ui")
            .and_then(|ui| ui.get("employeeFilter"))
            .and_then(Value::as_str)
            .map(|s| EmployeeFilter::from(s.to_string()))
            .unwrap_or_default();

        let saved_at = root
            .get("savedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        info!(
            from_version,
            to_version = CURRENT_SESSION_VERSION,
            punches = punches.len(),
            employees = employee_config.len(),
            "Session snapshot read"
        );

        Ok(Self {
            kind: SESSION_KIND.to_string(),
            version: CURRENT_SESSION_VERSION,
            saved_at,
            employee_config,
            punches,
            ui: UiState { employee_filter },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extras, OvertimeMode};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn read(value: Value) -> EngineResult<SessionSnapshot> {
        SessionSnapshot::from_value(value, &PayrollPolicy::default())
    }

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_wrong_kind() {
        let err = read(json!({"__kind": "other", "punches": []})).unwrap_err();
        assert!(matches!(err, EngineError::SessionFormat { .. }));
    }

    #[test]
    fn test_rejects_missing_punches_array() {
        let err = read(json!({"__kind": SESSION_KIND, "punches": {}})).unwrap_err();
        assert!(matches!(err, EngineError::SessionFormat { .. }));
    }

    #[test]
    fn test_rejects_future_version() {
        let err = read(json!({
            "__kind": SESSION_KIND, "version": 9, "punches": []
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedSessionVersion { version: 9, supported: CURRENT_SESSION_VERSION }
        ));
    }

    #[test]
    fn test_unreadable_punch_time_fails_whole_snapshot() {
        let err = read(json!({
            "__kind": SESSION_KIND,
            "version": 8,
            "punches": [{"employee": "Dana", "timeInISO": "soon", "timeOutISO": "2024-01-05T16:00:00"}]
        }))
        .unwrap_err();
        assert!(matches!(err, EngineError::SessionFormat { .. }));
    }

    #[test]
    fn test_rejects_instants_outside_supported_years() {
        for (time_in, time_out) in [
            ("+262142-12-31T23:00:00", "+262142-12-31T22:00:00"),
            ("0001-01-01T08:00:00", "0001-01-01T16:00:00"),
            ("2024-01-05T08:00:00", "+10000-01-01T00:00:00"),
        ] {
            let err = read(json!({
                "__kind": SESSION_KIND,
                "version": 8,
                "punches": [{"employee": "Dana", "timeInISO": time_in, "timeOutISO": time_out}]
            }))
            .unwrap_err();
            assert!(matches!(err, EngineError::SessionFormat { .. }), "for {time_in}");
        }
    }

    #[test]
    fn test_missing_employee_gets_configured_label() {
        let mut policy = PayrollPolicy::default();
        policy.labels.unidentified_label = "Unknown".to_string();
        let snapshot = SessionSnapshot::from_value(
            json!({
                "__kind": SESSION_KIND,
                "version": 8,
                "punches": [{"timeInISO": "2024-01-05T08:00:00", "timeOutISO": "2024-01-05T12:00:00"}]
            }),
            &policy,
        )
        .unwrap();

        assert_eq!(snapshot.punches[0].employee, EmployeeName::new("Unknown"));
    }

    #[test]
    fn test_v5_snapshot_upgrades() {
        let snapshot = read(json!({
            "__kind": "payroll-session",
            "version": 5,
            "savedAt": "2024-02-01T10:00:00.000Z",
            "empConfig": {
                "Dana  Levi": {"mode": "B", "rate": "45.5", "extras": {"travel": 100, "tips": "", "bonus": null, "advance": "20"}}
            },
            "punches": [
                {"employee": "Dana Levi", "dtInISO": "2024-01-05T08:00:00.000Z", "dtOutISO": "2024-01-05T16:00:00.000Z"},
                null
            ],
            "ui": {"employeeFilter": "Dana Levi"}
        }))
        .unwrap();

        assert_eq!(snapshot.version, CURRENT_SESSION_VERSION);
        let dana = EmployeeName::new("Dana Levi");
        let config = snapshot.employee_config.get(&dana).unwrap();
        assert_eq!(config.mode, OvertimeMode::B);
        assert_eq!(config.hourly_rate, dec("45.5"));
        assert!(config.extras.is_empty());
        assert_eq!(
            config.default_extras,
            Some(Extras::new(dec("100"), dec("0"), dec("0"), dec("20")))
        );
        assert_eq!(snapshot.punches.len(), 1);
        // Saved in UTC; the kiosk is two hours ahead in January.
        assert_eq!(snapshot.punches[0].time_in.to_string(), "2024-01-05 10:00:00");
        assert_eq!(snapshot.ui.employee_filter, EmployeeFilter::Employee(dana));
        assert!(snapshot.saved_at.is_some());
    }

    #[test]
    fn test_v7_snapshot_upgrades() {
        let snapshot = read(json!({
            "__kind": "payroll-session",
            "version": 7,
            "empConfig": {
                "Dana": {
                    "mode": "A",
                    "rate": 40,
                    "extras": {
                        "2024-01": {"travel": 10, "tips": 0, "bonus": 0, "advance": 0},
                        "2024-02": null,
                        "Feb": {"travel": 99},
                        "__default": {"travel": 5, "tips": 0, "bonus": 0, "advance": 0}
                    }
                }
            },
            "punches": [],
            "ui": {"employeeFilter": "ALL"}
        }))
        .unwrap();

        let config = snapshot.employee_config.get(&EmployeeName::new("Dana")).unwrap();
        assert_eq!(config.extras.len(), 1);
        assert_eq!(config.extras[&month("2024-01")].travel, dec("10"));
        assert_eq!(config.default_extras.unwrap().travel, dec("5"));
        assert_eq!(snapshot.ui.employee_filter, EmployeeFilter::All);
    }

    #[test]
    fn test_unversioned_snapshot_is_treated_as_oldest() {
        let snapshot = read(json!({
            "__kind": "payroll-session",
            "empConfig": {"Dana": {"rate": "abc", "extras": {"travel": 7}}},
            "punches": []
        }))
        .unwrap();

        let config = snapshot.employee_config.get(&EmployeeName::new("Dana")).unwrap();
        assert_eq!(config.hourly_rate, Decimal::ZERO);
        assert_eq!(config.mode, OvertimeMode::A);
        assert_eq!(config.default_extras.unwrap().travel, dec("7"));
    }

    #[test]
    fn test_names_colliding_after_normalization_merge() {
        let snapshot = read(json!({
            "__kind": "payroll-session",
            "version": 8,
            "employeeConfig": {
                "Dana Levi": {"rate": "30"},
                "Dana  Levi": {"rate": "40"}
            },
            "punches": []
        }))
        .unwrap();

        assert_eq!(snapshot.employee_config.len(), 1);
    }

    #[test]
    fn test_canonical_serialization_shape() {
        let mut employee_config = EmployeeDirectory::new();
        employee_config.set_rate(&EmployeeName::new("Dana"), dec("45.50"));
        let snapshot = SessionSnapshot {
            kind: SESSION_KIND.to_string(),
            version: CURRENT_SESSION_VERSION,
            saved_at: None,
            employee_config,
            punches: vec![],
            ui: UiState::default(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["__kind"], "payroll-session");
        assert_eq!(json["version"], 8);
        assert_eq!(json["employeeConfig"]["Dana"]["rate"], "45.50");
        assert_eq!(json["employeeConfig"]["Dana"]["mode"], "A");
        assert_eq!(json["ui"]["employeeFilter"], "ALL");
    }
}
