//! Attendance reshaping and presence classification
//!
//! Turns the wide roster into one [`AttendanceRecord`] per (employee, day)
//! and counts how many employees worked each day.

use crate::models::{AttendanceRecord, AttendanceSheet, DailyPresence};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Shift codes that mean the employee worked that day
pub const PRESENT_CODES: [&str; 17] = [
    "P1", "P2", "P3", "P4", "P10", "S1", "S2", "S4", "S5", "S6", "S7", "M1", "M3", "M4", "M5",
    "M6", "M7",
];

/// Classifies status codes as present or absent
#[derive(Debug, Clone)]
pub struct PresenceRule {
    codes: HashSet<String>,
}

impl PresenceRule {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff `status` is one of the worked-shift codes. Matching is exact.
    pub fn is_present(&self, status: &str) -> bool {
        self.codes.contains(status)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl Default for PresenceRule {
    fn default() -> Self {
        Self::new(PRESENT_CODES)
    }
}

/// Unpivot the roster into (employee, day, status) rows.
///
/// Every day column produces a row for every employee, including blank cells
/// and columns whose date label did not parse.
pub fn reshape(sheet: &AttendanceSheet, rule: &PresenceRule) -> Vec<AttendanceRecord> {
    let mut records = Vec::with_capacity(sheet.employees.len() * sheet.days.len());
    for (col, day) in sheet.days.iter().enumerate() {
        for employee in &sheet.employees {
            let status = employee.statuses.get(col).cloned().flatten();
            let present = status.as_deref().is_some_and(|s| rule.is_present(s));
            records.push(AttendanceRecord {
                employee_id: employee.employee_id.clone(),
                employee_name: employee.employee_name.clone(),
                date: day.date,
                status,
                present,
            });
        }
    }
    records
}

/// Count present employees per date, in date order.
///
/// Records without a parseable date are skipped.
pub fn daily_present(records: &[AttendanceRecord]) -> Vec<DailyPresence> {
    let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        *by_date.entry(date).or_default() += u32::from(record.present);
    }
    by_date
        .into_iter()
        .map(|(date, total_present)| DailyPresence {
            date,
            total_present,
        })
        .collect()
}
