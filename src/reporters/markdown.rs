//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Team wiki pages
//! - Daily stand-up notes
//! - Issue comments

use super::trend::linear_fit;
use super::{format_count, format_opt};
use crate::models::{AnomalyLabel, DashboardReport};
use chrono::Local;
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &DashboardReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_toc());
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str(&render_daily(report));
    md.push('\n');

    md.push_str(&render_queues(report));
    md.push('\n');

    md.push_str(&render_anomalies(report));
    md.push('\n');

    md.push_str(&render_attendance(report));
    md.push('\n');

    md.push_str(&render_correlation(report));
    md.push('\n');

    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &DashboardReport) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let sel = &report.selection;
    let period = match (sel.start, sel.end) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        _ => "all dates".to_string(),
    };

    let mut md = format!(
        r#"# Contact Center Dashboard

**Period:** {} | **Queues:** {} | **Rows:** {} of {}

Generated: {}
"#,
        period,
        if sel.queues.is_empty() {
            "none".to_string()
        } else {
            escape(&sel.queues.join(", "))
        },
        sel.rows_out,
        sel.rows_in,
        timestamp
    );
    for warning in &sel.warnings {
        md.push_str(&format!("\n> **Warning:** {}\n", escape(warning)));
    }
    md
}

fn render_toc() -> String {
    r#"## Table of Contents

- [Summary](#summary)
- [Daily Volume](#daily-volume)
- [Queues](#queues)
- [Anomalies](#anomalies)
- [Attendance](#attendance)
- [Head-count vs Output](#head-count-vs-output)
"#
    .to_string()
}

fn render_summary(report: &DashboardReport) -> String {
    let s = &report.summary;
    format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| Total Input | {} |
| Total Output | {} |
| Avg AHT (s) | {} |
| Avg Latency (s) | {} |
| Efficiency | {:.2}% |
"#,
        format_count(s.total_input),
        format_count(s.total_output),
        format_opt(s.mean_aht),
        format_opt(s.mean_latency),
        s.efficiency_pct
    )
}

fn render_daily(report: &DashboardReport) -> String {
    let mut md = String::from("## Daily Volume\n\n");
    if report.daily.is_empty() {
        md.push_str("_No KPI rows in this selection._\n");
        return md;
    }
    md.push_str("| Date | Input | Output | Avg AHT (s) | Avg Latency (s) |\n");
    md.push_str("|------|------:|-------:|------------:|----------------:|\n");
    for day in &report.daily {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            day.date,
            format_count(day.total_input),
            format_count(day.total_output),
            format_opt(day.mean_aht),
            format_opt(day.mean_latency)
        ));
    }
    md
}

fn render_queues(report: &DashboardReport) -> String {
    let mut md = String::from("## Queues\n\n");
    md.push_str("| Queue | Input | Output |\n");
    md.push_str("|-------|------:|-------:|\n");
    for q in &report.queues {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            escape(&q.queue),
            format_count(q.total_input),
            format_count(q.total_output)
        ));
    }
    md
}

fn render_anomalies(report: &DashboardReport) -> String {
    let a = &report.anomalies;
    let mut md = format!(
        r#"## Anomalies

Percentile: **p{:.0}** | AHT threshold: **{}s** | Latency threshold: **{}s**

"#,
        a.percentile * 100.0,
        format_opt(a.aht_threshold),
        format_opt(a.latency_threshold)
    );

    let flagged: Vec<_> = a
        .days
        .iter()
        .filter(|d| d.aht_anomaly || d.latency_anomaly)
        .collect();
    if flagged.is_empty() {
        md.push_str("_No anomalous days._\n");
        return md;
    }

    md.push_str("| Date | Avg AHT (s) | AHT | Avg Latency (s) | Latency |\n");
    md.push_str("|------|------------:|-----|----------------:|---------|\n");
    for day in flagged {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            day.daily.date,
            format_opt(day.daily.mean_aht),
            label_badge(day.aht_label),
            format_opt(day.daily.mean_latency),
            label_badge(day.latency_label)
        ));
    }
    md
}

fn render_attendance(report: &DashboardReport) -> String {
    let mut md = String::from("## Attendance\n\n### Status Distribution\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|------:|\n");
    for s in &report.status_counts {
        md.push_str(&format!("| {} | {} |\n", escape(&s.status), s.count));
    }

    md.push_str("\n### Daily Present Count\n\n");
    md.push_str("| Date | Present |\n");
    md.push_str("|------|--------:|\n");
    for day in &report.presence {
        md.push_str(&format!("| {} | {} |\n", day.date, day.total_present));
    }
    md
}

fn render_correlation(report: &DashboardReport) -> String {
    let mut md = String::from("## Head-count vs Output\n\n");
    let points: Vec<(f64, f64)> = report
        .correlation
        .iter()
        .map(|c| (f64::from(c.total_present), c.total_output))
        .collect();
    match linear_fit(&points) {
        Some(fit) => {
            md.push_str(&format!("Trend: `{}`", fit.equation()));
            if let Some(r) = fit.r {
                md.push_str(&format!(" (r = {:.2})", r));
            }
            md.push_str("\n\n");
        }
        None => md.push_str("_Not enough variation in head-count to fit a trend._\n\n"),
    }

    md.push_str("| Date | Present | Output |\n");
    md.push_str("|------|--------:|-------:|\n");
    for row in &report.correlation {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            row.date,
            row.total_present,
            format_count(row.total_output)
        ));
    }
    md
}

fn render_footer() -> String {
    "---\n\n_Generated by ccdash_\n".to_string()
}

fn label_badge(label: AnomalyLabel) -> &'static str {
    match label {
        AnomalyLabel::Anomaly => "🔴 Anomaly",
        AnomalyLabel::Normal => "Normal",
    }
}

/// Keep user-supplied labels from breaking table cells
fn escape(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_markdown_render_has_header() {
        let md = render(&test_report()).expect("render markdown");
        assert!(md.contains("# Contact Center Dashboard"));
        assert!(md.contains("**Period:** 2025-01-01 to 2025-01-07"));
    }

    #[test]
    fn test_markdown_has_table_of_contents() {
        let md = render(&test_report()).expect("render markdown");
        assert!(md.contains("## Table of Contents"));
        assert!(md.contains("- [Anomalies](#anomalies)"));
    }

    #[test]
    fn test_markdown_flags_spike_day() {
        let md = render(&test_report()).expect("render markdown");
        assert!(md.contains("| 2025-01-06 |"));
        assert!(md.contains("🔴 Anomaly"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let mut report = test_report();
        report.queues[0].queue = "Sales|EU".into();
        let md = render(&report).expect("render markdown");
        assert!(md.contains("Sales\\|EU"));
    }

    #[test]
    fn test_markdown_empty_selection() {
        let mut report = test_report();
        report.daily.clear();
        report.anomalies.days.clear();
        let md = render(&report).expect("render markdown");
        assert!(md.contains("_No KPI rows in this selection._"));
        assert!(md.contains("_No anomalous days._"));
    }
}
