//! Output reporters for dashboard reports
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `html` - Standalone HTML dashboard with inline SVG charts
//! - `markdown` - GitHub-flavored Markdown

mod html;
mod json;
mod markdown;
mod svg;
mod text;
pub mod trend;

use crate::models::DashboardReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, html, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a dashboard in the specified format
pub fn report(report: &DashboardReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a dashboard using an OutputFormat enum
pub fn report_with_format(report: &DashboardReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => html::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
        OutputFormat::Markdown => "md",
    }
}

/// `1234567.8` -> `1,234,568`
pub(crate) fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Two decimals, or `n/a` for a missing value
pub(crate) fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::filter::Selection;
    use crate::models::{AttendanceSheet, DayColumn, EmployeeRow, KpiRecord};
    use crate::pipeline::Dashboard;
    use chrono::NaiveDate;

    /// A small but complete dashboard for renderer tests
    pub(crate) fn test_report() -> DashboardReport {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let row = |day, queue: &str, input, output, aht, latency| KpiRecord {
            date: Some(d(day)),
            queue: queue.to_string(),
            total_input: Some(input),
            total_output: Some(output),
            aht_secs: aht,
            latency_secs: latency,
        };

        let mut records = Vec::new();
        for day in 1..=6 {
            let spike = if day == 6 { 400.0 } else { 0.0 };
            records.push(row(day, "Inbound", 100.0 + day as f64, 90.0, Some(300.0 + spike), Some(12.0)));
            records.push(row(day, "Email", 40.0, 35.0, Some(200.0), Some(30.0 + day as f64)));
        }
        records.push(row(7, "Chat <VIP>", 0.0, 0.0, None, None));

        let sheet = AttendanceSheet {
            days: (1..=7)
                .map(|day| DayColumn {
                    label: format!("{}-Jan", day),
                    date: Some(d(day)),
                })
                .collect(),
            employees: vec![
                EmployeeRow {
                    employee_id: "1".into(),
                    employee_name: "Ana".into(),
                    statuses: (1..=7).map(|_| Some("P1".to_string())).collect(),
                },
                EmployeeRow {
                    employee_id: "2".into(),
                    employee_name: "Budi".into(),
                    statuses: (1..=7)
                        .map(|day| Some(if day % 2 == 0 { "A" } else { "S1" }.to_string()))
                        .collect(),
                },
            ],
        };

        Dashboard::new().build(&records, &sheet, &Selection::default())
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("html").unwrap(), OutputFormat::Html);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_extensions_follow_display() {
        for fmt in [
            OutputFormat::Text,
            OutputFormat::Json,
            OutputFormat::Html,
            OutputFormat::Markdown,
        ] {
            assert_eq!(OutputFormat::from_str(&fmt.to_string()).unwrap(), fmt);
            assert!(!file_extension(fmt).is_empty());
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1234567.8), "1,234,568");
        assert_eq!(format_count(-1500.0), "-1,500");
    }

    #[test]
    fn test_every_format_renders() {
        let report = test_report();
        for fmt in ["text", "json", "html", "markdown"] {
            let out = super::report(&report, fmt).expect("render");
            assert!(!out.is_empty(), "{} output empty", fmt);
        }
    }
}
