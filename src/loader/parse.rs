//! Cell-level coercion for the CSV exports
//!
//! Both exports label days as `Day-Mon` without a year, and write decimals
//! with a comma. Nothing here fails: a cell that cannot be coerced becomes
//! `None` and is excluded downstream.

use chrono::NaiveDate;

/// Year appended to `Day-Mon` labels when none is configured
pub const DEFAULT_YEAR: i32 = 2025;

/// Parse a `Day-Mon` label such as `5-Jan` or `05-jan` into a date in `year`.
pub fn parse_day_label(label: &str, year: i32) -> Option<NaiveDate> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{label}-{year}"), "%d-%b-%Y").ok()
}

/// Parse a number written with a decimal comma (`300,5`) or point (`300.5`).
///
/// Blank cells, text, and non-finite values yield `None`.
pub fn parse_decimal(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Normalize a free-text cell: trimmed, `None` when blank
pub fn non_blank(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}
