//! Per-employee pay rollups and monthly statements.
//!
//! Pay is always derived from the current configuration: rows are recomputed
//! on every call and priced at the employee's current rate, so a rate change
//! reprices every day already on record.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollPolicy;
use crate::models::{
    DayPay, EmployeeDirectory, EmployeeName, HourTotals, MonthKey, MonthlyStatement, Punch,
    SummaryRow, SummaryTotals, WeightedRow,
};

use super::overtime::apply_overtime;
use super::segmentation::build_daily_base;

/// Runs the full day pipeline: segmentation, daily aggregation and weighting.
pub fn weighted_rows(
    punches: &[Punch],
    directory: &EmployeeDirectory,
    policy: &PayrollPolicy,
) -> Vec<WeightedRow> {
    let base = build_daily_base(punches, &policy.sabbath);
    apply_overtime(&base, directory, policy)
}

/// Rolls weighted days up into one row per employee, sorted by name.
///
/// Base pay is each day's weighted hours times the employee's current rate.
/// Extras are summed over the employee's monthly entries (see
/// [`EmployeeConfig::total_extras`](crate::models::EmployeeConfig::total_extras)).
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{summarize, weighted_rows};
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{EmployeeDirectory, EmployeeName, Punch};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let dana = EmployeeName::new("Dana");
/// let punches = vec![Punch::new(dana.clone(), at("2024-01-07 08:00"), at("2024-01-07 16:00"))];
///
/// let mut directory = EmployeeDirectory::new();
/// directory.set_rate(&dana, Decimal::new(50, 0));
///
/// let rows = weighted_rows(&punches, &directory, &PayrollPolicy::default());
/// let summary = summarize(&rows, &directory);
/// assert_eq!(summary[0].base_pay, Decimal::new(400, 0));
/// ```
pub fn summarize(rows: &[WeightedRow], directory: &EmployeeDirectory) -> Vec<SummaryRow> {
    let mut by_employee: BTreeMap<&EmployeeName, (HourTotals, Decimal)> = BTreeMap::new();

    for row in rows {
        let employee = &row.base.employee;
        let rate = directory.rate_of(employee);
        let (hours, base_pay) = by_employee.entry(employee).or_default();
        hours.add_row(row);
        *base_pay += row.weighted_hours * rate;
    }

    by_employee
        .into_iter()
        .map(|(employee, (hours, base_pay))| {
            let extras = directory
                .get(employee)
                .map(|config| config.total_extras())
                .unwrap_or_default();
            SummaryRow {
                employee: employee.clone(),
                hours,
                base_pay,
                extras,
                final_pay: base_pay + extras.net(),
            }
        })
        .collect()
}

/// Column sums over summary rows, the footer of the summary table.
pub fn summary_totals(rows: &[SummaryRow]) -> SummaryTotals {
    rows.iter().fold(SummaryTotals::default(), |mut totals, row| {
        totals.hours += row.hours;
        totals.base_pay += row.base_pay;
        totals.extras += row.extras;
        totals.final_pay += row.final_pay;
        totals
    })
}

/// Every employee with at least one punch, sorted by name.
pub fn employees(punches: &[Punch]) -> Vec<EmployeeName> {
    punches
        .iter()
        .map(|p| p.employee.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The employee `step` places away from `current` in the sorted list,
/// wrapping around at either end.
///
/// Returns `None` if `current` has no punches.
pub fn adjacent_employee(
    punches: &[Punch],
    current: &EmployeeName,
    step: isize,
) -> Option<EmployeeName> {
    let names = employees(punches);
    let index = names.iter().position(|name| name == current)?;
    let len = names.len() as isize;
    let next = (index as isize + step).rem_euclid(len) as usize;
    names.get(next).cloned()
}

/// Months in which the employee clocked in, ascending.
pub fn months_for_employee(punches: &[Punch], employee: &EmployeeName) -> Vec<MonthKey> {
    punches
        .iter()
        .filter(|p| &p.employee == employee)
        .map(|p| MonthKey::of(p.time_in.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Builds one employee's statement for one month.
///
/// Days are the weighted rows dated in the month. Punches are those clocked
/// in during the month, in clock-in order. Extras are the month's explicit
/// entry, else the employee's default, else zero.
pub fn monthly_statement(
    punches: &[Punch],
    directory: &EmployeeDirectory,
    employee: &EmployeeName,
    month: MonthKey,
    policy: &PayrollPolicy,
) -> MonthlyStatement {
    let hourly_rate = directory.rate_of(employee);

    let days: Vec<DayPay> = weighted_rows(punches, directory, policy)
        .into_iter()
        .filter(|row| &row.base.employee == employee && month.contains(row.base.date))
        .map(|row| {
            let pay = row.weighted_hours * hourly_rate;
            DayPay { row, pay }
        })
        .collect();

    let mut month_punches: Vec<Punch> = punches
        .iter()
        .filter(|p| &p.employee == employee && month.contains(p.time_in.date()))
        .cloned()
        .collect();
    month_punches.sort_by_key(|p| p.time_in);

    let weighted_hours: Decimal = days.iter().map(|d| d.row.weighted_hours).sum();
    let base_pay: Decimal = days.iter().map(|d| d.pay).sum();
    let extras = directory.extras_for_month(employee, month);
    let extras_net = extras.net();

    debug!(
        employee = %employee,
        month = %month,
        days = days.len(),
        punches = month_punches.len(),
        "Monthly statement built"
    );

    MonthlyStatement {
        employee: employee.clone(),
        month,
        hourly_rate,
        days,
        punches: month_punches,
        weighted_hours,
        base_pay,
        extras,
        extras_net,
        final_pay: base_pay + extras_net,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extras, OvertimeMode};
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn punch(name: &str, start: &str, end: &str) -> Punch {
        Punch::new(EmployeeName::new(name), make_datetime(start), make_datetime(end))
    }

    fn extras(travel: &str, tips: &str, bonus: &str, advance: &str) -> Extras {
        Extras::new(dec(travel), dec(tips), dec(bonus), dec(advance))
    }

    fn sample_punches() -> Vec<Punch> {
        vec![
            // Sunday, 12.5h => 13.75 weighted in mode A
            punch("Dana", "2024-01-07 07:00:00", "2024-01-07 19:30:00"),
            // Saturday full window => 13.5 weighted
            punch("Dana", "2024-01-13 08:00:00", "2024-01-13 17:00:00"),
            punch("Avi", "2024-01-08 09:00:00", "2024-01-08 17:00:00"),
            punch("Dana", "2024-02-04 08:00:00", "2024-02-04 16:00:00"),
        ]
    }

    #[test]
    fn test_summary_sums_hours_and_pay() {
        let dana = EmployeeName::new("Dana");
        let mut directory = EmployeeDirectory::new();
        directory.set_rate(&dana, dec("40"));
        directory.set_extras(&dana, month("2024-01"), extras("100", "50", "0", "30"));

        let rows = weighted_rows(&sample_punches(), &directory, &PayrollPolicy::default());
        let summary = summarize(&rows, &directory);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].employee.as_str(), "Avi");
        assert_eq!(summary[0].base_pay, Decimal::ZERO);

        let dana_row = &summary[1];
        assert_eq!(dana_row.hours.total_hours, dec("29.5"));
        assert_eq!(dana_row.hours.sabbath150_hours, dec("9"));
        assert_eq!(dana_row.hours.weighted_hours, dec("35.25"));
        assert_eq!(dana_row.base_pay, dec("1410"));
        assert_eq!(dana_row.extras.travel, dec("100"));
        assert_eq!(dana_row.final_pay, dec("1530"));
    }

    #[test]
    fn test_rate_edit_reprices_history() {
        let dana = EmployeeName::new("Dana");
        let punches = vec![punch("Dana", "2024-01-07 08:00:00", "2024-01-07 16:00:00")];
        let mut directory = EmployeeDirectory::new();
        directory.set_rate(&dana, dec("40"));

        let policy = PayrollPolicy::default();
        let before = summarize(&weighted_rows(&punches, &directory, &policy), &directory);
        assert_eq!(before[0].base_pay, dec("320"));

        directory.set_rate(&dana, dec("50"));
        let after = summarize(&weighted_rows(&punches, &directory, &policy), &directory);
        assert_eq!(after[0].base_pay, dec("400"));
    }

    #[test]
    fn test_mode_change_reweights_history() {
        let dana = EmployeeName::new("Dana");
        let punches = vec![punch("Dana", "2024-01-07 07:00:00", "2024-01-07 19:30:00")];
        let mut directory = EmployeeDirectory::new();
        directory.set_rate(&dana, dec("10"));
        directory.set_mode(&dana, OvertimeMode::B);

        let rows = weighted_rows(&punches, &directory, &PayrollPolicy::default());
        assert_eq!(summarize(&rows, &directory)[0].base_pay, dec("125"));
    }

    #[test]
    fn test_all_zero_months_fall_back_to_default() {
        let dana = EmployeeName::new("Dana");
        let mut directory = EmployeeDirectory::new();
        directory.set_extras(&dana, month("2024-01"), Extras::default());
        directory.set_extras(&dana, month("2024-02"), Extras::default());
        directory.set_default_extras(&dana, Some(extras("250", "0", "0", "0")));

        let rows = weighted_rows(&sample_punches(), &directory, &PayrollPolicy::default());
        let summary = summarize(&rows, &directory);
        assert_eq!(summary[1].extras.travel, dec("250"));
        assert_eq!(summary[1].final_pay, dec("250"));
    }

    #[test]
    fn test_explicit_months_override_default_in_summary() {
        let dana = EmployeeName::new("Dana");
        let mut directory = EmployeeDirectory::new();
        directory.set_extras(&dana, month("2024-01"), extras("0", "20", "0", "0"));
        directory.set_extras(&dana, month("2024-02"), extras("0", "30", "0", "10"));
        directory.set_default_extras(&dana, Some(extras("250", "0", "0", "0")));

        let rows = weighted_rows(&sample_punches(), &directory, &PayrollPolicy::default());
        let summary = summarize(&rows, &directory);
        assert_eq!(summary[1].extras, extras("0", "50", "0", "10"));
    }

    #[test]
    fn test_summary_totals_add_columns() {
        let dana = EmployeeName::new("Dana");
        let avi = EmployeeName::new("Avi");
        let mut directory = EmployeeDirectory::new();
        directory.set_rate(&dana, dec("10"));
        directory.set_rate(&avi, dec("20"));
        directory.set_extras(&avi, month("2024-01"), extras("15", "0", "0", "5"));

        let rows = weighted_rows(&sample_punches(), &directory, &PayrollPolicy::default());
        let summary = summarize(&rows, &directory);
        let totals = summary_totals(&summary);

        assert_eq!(totals.hours.total_hours, dec("37.5"));
        assert_eq!(totals.base_pay, summary[0].base_pay + summary[1].base_pay);
        assert_eq!(totals.extras.advance, dec("5"));
        assert_eq!(totals.final_pay, summary[0].final_pay + summary[1].final_pay);
    }

    #[test]
    fn test_monthly_statement_selects_month() {
        let dana = EmployeeName::new("Dana");
        let mut directory = EmployeeDirectory::new();
        directory.set_rate(&dana, dec("40"));
        directory.set_default_extras(&dana, Some(extras("100", "0", "0", "0")));
        directory.set_extras(&dana, month("2024-02"), extras("0", "0", "0", "50"));

        let punches = sample_punches();
        let policy = PayrollPolicy::default();

        let january = monthly_statement(&punches, &directory, &dana, month("2024-01"), &policy);
        assert_eq!(january.days.len(), 2);
        assert_eq!(january.punches.len(), 2);
        assert_eq!(january.weighted_hours, dec("27.25"));
        assert_eq!(january.base_pay, dec("1090"));
        assert_eq!(january.extras.travel, dec("100"));
        assert_eq!(january.final_pay, dec("1190"));

        let february = monthly_statement(&punches, &directory, &dana, month("2024-02"), &policy);
        assert_eq!(february.days.len(), 1);
        assert_eq!(february.base_pay, dec("320"));
        assert_eq!(february.extras_net, dec("-50"));
        assert_eq!(february.final_pay, dec("270"));
    }

    #[test]
    fn test_monthly_statement_punches_in_clock_in_order() {
        let dana = EmployeeName::new("Dana");
        let punches = vec![
            punch("Dana", "2024-01-09 08:00:00", "2024-01-09 10:00:00"),
            punch("Dana", "2024-01-02 08:00:00", "2024-01-02 10:00:00"),
        ];
        let statement = monthly_statement(
            &punches,
            &EmployeeDirectory::new(),
            &dana,
            month("2024-01"),
            &PayrollPolicy::default(),
        );

        assert_eq!(statement.punches[0].time_in, make_datetime("2024-01-02 08:00:00"));
        assert_eq!(statement.days[0].row.base.date.to_string(), "2024-01-02");
    }

    #[test]
    fn test_employee_listing_and_months() {
        let punches = sample_punches();
        let names: Vec<String> = employees(&punches).iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["Avi", "Dana"]);

        let months = months_for_employee(&punches, &EmployeeName::new("Dana"));
        assert_eq!(months, vec![month("2024-01"), month("2024-02")]);
    }

    #[test]
    fn test_adjacent_employee_wraps() {
        let punches = sample_punches();
        let avi = EmployeeName::new("Avi");
        let dana = EmployeeName::new("Dana");

        assert_eq!(adjacent_employee(&punches, &avi, 1), Some(dana.clone()));
        assert_eq!(adjacent_employee(&punches, &dana, 1), Some(avi.clone()));
        assert_eq!(adjacent_employee(&punches, &avi, -1), Some(dana));
        assert_eq!(adjacent_employee(&punches, &EmployeeName::new("Nobody"), 1), None);
    }
}
