//! Overtime tiers and weighted hours.
//!
//! Daily non-Saturday-premium hours are split into tiers according to the
//! employee's [`OvertimeMode`]. Saturday premium hours are weighted at the
//! premium multiplier in every mode.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::models::{DailyBaseRow, EmployeeDirectory, OvertimeMode, WeightedRow};

/// Weights one day for the given mode.
///
/// Mode `A` pays the first `regular_threshold_hours` at 100%, the next
/// `overtime_125_band_hours` at 125% and the rest at 150%. Mode `B` pays every
/// non-premium hour at 100%.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::weight_row;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{DailyBaseRow, EmployeeName, OvertimeMode};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let row = DailyBaseRow {
///     employee: EmployeeName::new("Dana"),
///     date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     total_hours: Decimal::from_str("12.5").unwrap(),
///     non_sabbath_hours: Decimal::from_str("12.5").unwrap(),
///     sabbath150_hours: Decimal::ZERO,
/// };
///
/// let weighted = weight_row(&row, OvertimeMode::A, &PayrollPolicy::default());
/// assert_eq!(weighted.regular_hours, Decimal::from(9));
/// assert_eq!(weighted.overtime125_hours, Decimal::from(2));
/// assert_eq!(weighted.overtime150_hours, Decimal::from_str("1.5").unwrap());
/// assert_eq!(weighted.weighted_hours, Decimal::from_str("13.75").unwrap());
/// ```
pub fn weight_row(row: &DailyBaseRow, mode: OvertimeMode, policy: &PayrollPolicy) -> WeightedRow {
    let overtime = &policy.overtime;
    let hours = row.non_sabbath_hours;

    let (regular_hours, overtime125_hours, overtime150_hours) = match mode {
        OvertimeMode::A => {
            let threshold = overtime.regular_threshold_hours;
            let regular = hours.min(threshold);
            let ot125 = (hours - threshold)
                .max(Decimal::ZERO)
                .min(overtime.overtime_125_band_hours);
            let ot150 = (hours - overtime.overtime_150_threshold_hours()).max(Decimal::ZERO);
            (regular, ot125, ot150)
        }
        OvertimeMode::B => (hours, Decimal::ZERO, Decimal::ZERO),
    };

    let weighted_hours = regular_hours
        + overtime.overtime_125_multiplier * overtime125_hours
        + overtime.overtime_150_multiplier * overtime150_hours
        + policy.sabbath.multiplier * row.sabbath150_hours;

    WeightedRow {
        base: row.clone(),
        regular_hours,
        overtime125_hours,
        overtime150_hours,
        weighted_hours,
    }
}

/// Weights every row with the mode configured for its employee.
///
/// Modes are looked up on each call, so changing a mode in the directory
/// changes the next result.
pub fn apply_overtime(
    rows: &[DailyBaseRow],
    directory: &EmployeeDirectory,
    policy: &PayrollPolicy,
) -> Vec<WeightedRow> {
    rows.iter()
        .map(|row| weight_row(row, directory.mode_of(&row.employee), policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeName;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(employee: &str, non_sabbath: &str, sabbath: &str) -> DailyBaseRow {
        DailyBaseRow {
            employee: EmployeeName::new(employee),
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            total_hours: dec(non_sabbath) + dec(sabbath),
            non_sabbath_hours: dec(non_sabbath),
            sabbath150_hours: dec(sabbath),
        }
    }

    #[test]
    fn test_mode_a_tiers() {
        let row = weight_row(&day("Dana", "12.5", "0"), OvertimeMode::A, &PayrollPolicy::default());

        assert_eq!(row.regular_hours, dec("9"));
        assert_eq!(row.overtime125_hours, dec("2"));
        assert_eq!(row.overtime150_hours, dec("1.5"));
        assert_eq!(row.weighted_hours, dec("13.75"));
    }

    #[test]
    fn test_mode_b_is_flat() {
        let row = weight_row(&day("Dana", "12.5", "0"), OvertimeMode::B, &PayrollPolicy::default());

        assert_eq!(row.regular_hours, dec("12.5"));
        assert_eq!(row.overtime125_hours, Decimal::ZERO);
        assert_eq!(row.overtime150_hours, Decimal::ZERO);
        assert_eq!(row.weighted_hours, dec("12.5"));
    }

    #[test]
    fn test_mode_a_inside_first_band() {
        let row = weight_row(&day("Dana", "10", "0"), OvertimeMode::A, &PayrollPolicy::default());

        assert_eq!(row.regular_hours, dec("9"));
        assert_eq!(row.overtime125_hours, dec("1"));
        assert_eq!(row.overtime150_hours, Decimal::ZERO);
        assert_eq!(row.weighted_hours, dec("10.25"));
    }

    #[test]
    fn test_mode_a_under_threshold() {
        let row = weight_row(&day("Dana", "7.5", "0"), OvertimeMode::A, &PayrollPolicy::default());

        assert_eq!(row.regular_hours, dec("7.5"));
        assert_eq!(row.weighted_hours, dec("7.5"));
    }

    #[test]
    fn test_sabbath_hours_weighted_in_both_modes() {
        let base = day("Dana", "2", "9");
        let a = weight_row(&base, OvertimeMode::A, &PayrollPolicy::default());
        let b = weight_row(&base, OvertimeMode::B, &PayrollPolicy::default());

        // 2 + 1.5 * 9
        assert_eq!(a.weighted_hours, dec("15.5"));
        assert_eq!(b.weighted_hours, dec("15.5"));
    }

    #[test]
    fn test_premium_hours_do_not_count_toward_overtime() {
        let row = weight_row(&day("Dana", "8", "4"), OvertimeMode::A, &PayrollPolicy::default());

        assert_eq!(row.overtime125_hours, Decimal::ZERO);
        assert_eq!(row.weighted_hours, dec("14"));
    }

    #[test]
    fn test_mode_resolved_per_employee_at_call_time() {
        let rows = vec![day("Avi", "12", "0"), day("Dana", "12", "0")];
        let mut directory = EmployeeDirectory::new();
        directory.set_mode(&EmployeeName::new("Dana"), OvertimeMode::B);

        let weighted = apply_overtime(&rows, &directory, &PayrollPolicy::default());
        // Avi is unconfigured and falls back to mode A: 9 + 2.5 + 1.5
        assert_eq!(weighted[0].weighted_hours, dec("13"));
        assert_eq!(weighted[1].weighted_hours, dec("12"));

        directory.set_mode(&EmployeeName::new("Dana"), OvertimeMode::A);
        let weighted = apply_overtime(&rows, &directory, &PayrollPolicy::default());
        assert_eq!(weighted[1].weighted_hours, dec("13"));
    }

    #[test]
    fn test_configured_threshold() {
        let mut policy = PayrollPolicy::default();
        policy.overtime.regular_threshold_hours = dec("8");
        let row = weight_row(&day("Dana", "10", "0"), OvertimeMode::A, &policy);

        assert_eq!(row.regular_hours, dec("8"));
        assert_eq!(row.overtime125_hours, dec("2"));
        assert_eq!(row.weighted_hours, dec("10.5"));
    }
}
