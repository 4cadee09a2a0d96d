//! Per-employee pay configuration.
//!
//! This module defines the overtime mode, the monthly extras record and the
//! [`EmployeeDirectory`] that owns every employee's configuration for a
//! session.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeName, MonthKey};

/// How daily non-Sabbath hours are split into overtime tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OvertimeMode {
    /// Tiered: regular, then a 125% band, then 150%.
    #[default]
    A,
    /// Flat: every non-Sabbath hour is regular.
    B,
}

impl FromStr for OvertimeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(()),
        }
    }
}

/// Manually entered pay adjustments for one month.
///
/// `advance` is a deduction; the other three are additions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    /// Travel reimbursement.
    #[serde(default)]
    pub travel: Decimal,
    /// Tips.
    #[serde(default)]
    pub tips: Decimal,
    /// Pay supplement.
    #[serde(default)]
    pub bonus: Decimal,
    /// Advance repayment, deducted from pay.
    #[serde(default)]
    pub advance: Decimal,
}

impl Extras {
    /// Creates an extras record.
    pub fn new(travel: Decimal, tips: Decimal, bonus: Decimal, advance: Decimal) -> Self {
        Self {
            travel,
            tips,
            bonus,
            advance,
        }
    }

    /// Net effect on pay: additions minus the advance.
    pub fn net(&self) -> Decimal {
        self.travel + self.tips + self.bonus - self.advance
    }

    /// Returns true if all four fields are zero.
    pub fn is_zero(&self) -> bool {
        self.travel.is_zero() && self.tips.is_zero() && self.bonus.is_zero() && self.advance.is_zero()
    }
}

impl Add for Extras {
    type Output = Extras;

    fn add(self, rhs: Extras) -> Extras {
        Extras {
            travel: self.travel + rhs.travel,
            tips: self.tips + rhs.tips,
            bonus: self.bonus + rhs.bonus,
            advance: self.advance + rhs.advance,
        }
    }
}

impl AddAssign for Extras {
    fn add_assign(&mut self, rhs: Extras) {
        *self = *self + rhs;
    }
}

/// Pay configuration for one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeConfig {
    /// Overtime mode.
    #[serde(default)]
    pub mode: OvertimeMode,
    /// Hourly rate applied to weighted hours.
    #[serde(rename = "rate", default)]
    pub hourly_rate: Decimal,
    /// Explicit extras per month.
    #[serde(default)]
    pub extras: BTreeMap<MonthKey, Extras>,
    /// Extras carried over from sessions that predate per-month entries.
    #[serde(default)]
    pub default_extras: Option<Extras>,
}

impl EmployeeConfig {
    /// Extras in effect for a month: the explicit entry, else the default,
    /// else zero.
    pub fn extras_for_month(&self, month: MonthKey) -> Extras {
        self.extras
            .get(&month)
            .copied()
            .or(self.default_extras)
            .unwrap_or_default()
    }

    /// Extras summed across every explicit month.
    ///
    /// When every explicit entry is zero (or there are none) and a default
    /// record exists, the default replaces the total.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{EmployeeConfig, Extras, MonthKey};
    /// use rust_decimal::Decimal;
    ///
    /// let mut config = EmployeeConfig::default();
    /// config.extras.insert("2024-01".parse().unwrap(), Extras::default());
    /// config.default_extras = Some(Extras::new(Decimal::new(100, 0), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
    /// assert_eq!(config.total_extras().travel, Decimal::new(100, 0));
    /// ```
    pub fn total_extras(&self) -> Extras {
        if self.extras.values().all(Extras::is_zero) {
            if let Some(default) = self.default_extras {
                return default;
            }
        }
        self.extras
            .values()
            .fold(Extras::default(), |acc, extras| acc + *extras)
    }
}

/// Every employee's configuration, keyed by normalized name.
///
/// Entries are created explicitly through [`EmployeeDirectory::ensure`] or a
/// setter; read accessors never create entries and fall back to the defaults
/// (mode A, rate zero, no extras).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDirectory {
    entries: BTreeMap<EmployeeName, EmployeeConfig>,
}

impl EmployeeDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the employee's configuration, creating a default one first if
    /// none exists.
    pub fn ensure(&mut self, name: &EmployeeName) -> &mut EmployeeConfig {
        self.entries.entry(name.clone()).or_default()
    }

    /// Returns the employee's configuration if one exists.
    pub fn get(&self, name: &EmployeeName) -> Option<&EmployeeConfig> {
        self.entries.get(name)
    }

    /// Replaces the employee's configuration.
    pub fn insert(&mut self, name: EmployeeName, config: EmployeeConfig) {
        self.entries.insert(name, config);
    }

    /// Sets the overtime mode.
    pub fn set_mode(&mut self, name: &EmployeeName, mode: OvertimeMode) {
        self.ensure(name).mode = mode;
    }

    /// Sets the hourly rate.
    pub fn set_rate(&mut self, name: &EmployeeName, rate: Decimal) {
        self.ensure(name).hourly_rate = rate;
    }

    /// Records the extras for one month, replacing any previous entry.
    pub fn set_extras(&mut self, name: &EmployeeName, month: MonthKey, extras: Extras) {
        self.ensure(name).extras.insert(month, extras);
    }

    /// Sets or clears the default extras record.
    pub fn set_default_extras(&mut self, name: &EmployeeName, extras: Option<Extras>) {
        self.ensure(name).default_extras = extras;
    }

    /// The employee's overtime mode, `A` when unconfigured.
    pub fn mode_of(&self, name: &EmployeeName) -> OvertimeMode {
        self.get(name).map(|c| c.mode).unwrap_or_default()
    }

    /// The employee's current hourly rate, zero when unconfigured.
    pub fn rate_of(&self, name: &EmployeeName) -> Decimal {
        self.get(name).map(|c| c.hourly_rate).unwrap_or_default()
    }

    /// Extras in effect for the employee in a month.
    pub fn extras_for_month(&self, name: &EmployeeName, month: MonthKey) -> Extras {
        self.get(name)
            .map(|c| c.extras_for_month(month))
            .unwrap_or_default()
    }

    /// Iterates over configured names in order.
    pub fn names(&self) -> impl Iterator<Item = &EmployeeName> {
        self.entries.keys()
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&EmployeeName, &EmployeeConfig)> {
        self.entries.iter()
    }

    /// Number of configured employees.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no employee is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
