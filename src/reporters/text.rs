//! Text (terminal) reporter with colors and formatting
//!
//! Colors go through `console`, so they switch off automatically when
//! stdout is not a terminal or when the caller disables them globally.

use super::trend::linear_fit;
use super::{format_count, format_opt};
use crate::models::{AnomalyLabel, DashboardReport};
use anyhow::Result;
use console::style;
use std::fmt::Write;

const RULE: &str = "──────────────────────────────────────────────────────────";

/// Render report as formatted terminal output
pub fn render(report: &DashboardReport) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "\n{}", style("Contact Center Dashboard").bold())?;
    writeln!(out, "{}", style(RULE).dim())?;
    write_selection(&mut out, report)?;
    write_summary(&mut out, report)?;
    write_daily(&mut out, report)?;
    write_queues(&mut out, report)?;
    write_anomalies(&mut out, report)?;
    write_attendance(&mut out, report)?;
    write_correlation(&mut out, report)?;

    Ok(out)
}

fn heading(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "\n{}", style(title).bold())
}

fn write_selection(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    let sel = &report.selection;
    match (sel.start, sel.end) {
        (Some(start), Some(end)) => writeln!(out, "Period: {} to {}", start, end)?,
        _ => writeln!(out, "Period: all dates")?,
    }
    writeln!(
        out,
        "Queues: {}  {}",
        if sel.queues.is_empty() {
            "(none)".to_string()
        } else {
            sel.queues.join(", ")
        },
        style(format!("({} of {} rows)", sel.rows_out, sel.rows_in)).dim()
    )?;
    for warning in &sel.warnings {
        writeln!(out, "{} {}", style("warning:").yellow().bold(), warning)?;
    }
    Ok(())
}

fn write_summary(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    let s = &report.summary;
    heading(out, "SUMMARY")?;
    writeln!(
        out,
        "  Total Input: {}  Total Output: {}  Efficiency: {}",
        style(format_count(s.total_input)).bold(),
        style(format_count(s.total_output)).bold(),
        efficiency_styled(s.efficiency_pct)
    )?;
    writeln!(
        out,
        "  Avg AHT: {}s  Avg Latency: {}s",
        format_opt(s.mean_aht),
        format_opt(s.mean_latency)
    )
}

fn efficiency_styled(pct: f64) -> console::StyledObject<String> {
    let text = format!("{:.2}%", pct);
    if pct >= 90.0 {
        style(text).green()
    } else if pct >= 75.0 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

fn write_daily(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    heading(out, "DAILY")?;
    if report.daily.is_empty() {
        return writeln!(out, "  {}", style("No KPI rows in this selection").dim());
    }
    writeln!(
        out,
        "{}",
        style(format!(
            "  {:<10}  {:>10}  {:>10}  {:>9}  {:>9}",
            "DATE", "INPUT", "OUTPUT", "AHT", "LATENCY"
        ))
        .dim()
    )?;
    for day in &report.daily {
        writeln!(
            out,
            "  {:<10}  {:>10}  {:>10}  {:>9}  {:>9}",
            day.date,
            format_count(day.total_input),
            format_count(day.total_output),
            format_opt(day.mean_aht),
            format_opt(day.mean_latency)
        )?;
    }
    Ok(())
}

fn write_queues(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    heading(out, "QUEUES")?;
    for q in &report.queues {
        writeln!(
            out,
            "  {:<24}  {:>10}  {:>10}",
            q.queue,
            format_count(q.total_input),
            format_count(q.total_output)
        )?;
    }
    Ok(())
}

fn write_anomalies(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    let a = &report.anomalies;
    heading(
        out,
        &format!("ANOMALIES (p{:.0})", a.percentile * 100.0),
    )?;
    writeln!(
        out,
        "  AHT threshold: {}s ({} flagged)  Latency threshold: {}s ({} flagged)",
        format_opt(a.aht_threshold),
        a.aht_anomalies(),
        format_opt(a.latency_threshold),
        a.latency_anomalies()
    )?;
    for day in a.days.iter().filter(|d| d.aht_anomaly || d.latency_anomaly) {
        let mut parts = Vec::new();
        if day.aht_label == AnomalyLabel::Anomaly {
            parts.push(format!("AHT {}s", format_opt(day.daily.mean_aht)));
        }
        if day.latency_label == AnomalyLabel::Anomaly {
            parts.push(format!("latency {}s", format_opt(day.daily.mean_latency)));
        }
        writeln!(
            out,
            "  {}  {}",
            style(day.daily.date).red(),
            parts.join(", ")
        )?;
    }
    Ok(())
}

fn write_attendance(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    heading(out, "ATTENDANCE")?;
    if !report.status_counts.is_empty() {
        let codes: Vec<String> = report
            .status_counts
            .iter()
            .map(|s| format!("{} {}", s.status, s.count))
            .collect();
        writeln!(out, "  Statuses: {}", codes.join(" | "))?;
    }
    for day in &report.presence {
        writeln!(out, "  {:<10}  {:>4} present", day.date, day.total_present)?;
    }
    Ok(())
}

fn write_correlation(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
    heading(out, "HEAD-COUNT VS OUTPUT")?;
    let points: Vec<(f64, f64)> = report
        .correlation
        .iter()
        .map(|c| (f64::from(c.total_present), c.total_output))
        .collect();
    match linear_fit(&points) {
        Some(fit) => {
            write!(out, "  Trend: {}", fit.equation())?;
            if let Some(r) = fit.r {
                write!(out, "  (r = {:.2})", r)?;
            }
            writeln!(out)
        }
        None => writeln!(
            out,
            "  {}",
            style("Not enough variation in head-count to fit a trend").dim()
        ),
    }
}
