//! HTML reporter with embedded styles and charts
//!
//! Generates a standalone HTML dashboard that can be viewed in any browser.
//! Includes:
//! - The five headline KPI cards
//! - Input/output, AHT and latency time series
//! - Queue comparison and status distribution bars
//! - Two-panel anomaly view with thresholds
//! - Daily head-count and head-count vs. output scatter with trend line

use super::svg::{self, escape, Overlay, Series};
use super::trend::linear_fit;
use super::{format_count, format_opt};
use crate::models::DashboardReport;
use anyhow::Result;
use chrono::Local;

const INPUT_COLOR: &str = "#6366f1";
const OUTPUT_COLOR: &str = "#10b981";
const AHT_COLOR: &str = "#0ea5e9";
const LATENCY_COLOR: &str = "#f59e0b";

/// Render report as standalone HTML
pub fn render(report: &DashboardReport) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head());
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header(report));

    html.push_str("<div class=\"content\">\n");
    html.push_str(&render_warnings(report));
    html.push_str(&render_metrics(report));
    html.push_str(&render_time_series(report));
    html.push_str(&render_queues(report));
    html.push_str(&render_anomalies(report));
    html.push_str(&render_attendance(report));
    html.push_str(&render_correlation(report));
    html.push_str("</div>\n"); // content

    html.push_str(&render_footer());
    html.push_str("</div>\n</body>\n</html>");

    Ok(html)
}

fn render_head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Contact Center Dashboard</title>
    <style>
{CSS}
    </style>
</head>
"#
    )
}

fn render_header(report: &DashboardReport) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let sel = &report.selection;
    let period = match (sel.start, sel.end) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        _ => "All dates".to_string(),
    };
    let queues = if sel.queues.is_empty() {
        "no queues".to_string()
    } else {
        sel.queues.join(", ")
    };
    format!(
        r#"<div class="header">
    <h1>Contact Center Dashboard</h1>
    <p class="period">{} &middot; {}</p>
    <p class="timestamp">Generated {} &middot; {} of {} KPI rows</p>
</div>
"#,
        escape(&period),
        escape(&queues),
        timestamp,
        sel.rows_out,
        sel.rows_in
    )
}

fn render_warnings(report: &DashboardReport) -> String {
    report
        .selection
        .warnings
        .iter()
        .map(|w| format!("<div class=\"warning\">⚠️ {}</div>\n", escape(w)))
        .collect()
}

fn render_metrics(report: &DashboardReport) -> String {
    let s = &report.summary;
    let cards = [
        ("Total Input", format_count(s.total_input)),
        ("Total Output", format_count(s.total_output)),
        ("Avg AHT (s)", format_opt(s.mean_aht)),
        ("Avg Latency (s)", format_opt(s.mean_latency)),
        ("Efficiency", format!("{:.2}%", s.efficiency_pct)),
    ];

    let mut html = String::from(
        "<div class=\"section\">\n    <div class=\"metrics-grid\">\n",
    );
    for (label, value) in cards {
        html.push_str(&format!(
            "        <div class=\"metric-card\"><h3>{}</h3><div class=\"metric-value\">{}</div></div>\n",
            label, value
        ));
    }
    html.push_str(&format!(
        "    </div>\n    <div class=\"metric-bar\"><div class=\"metric-bar-fill {}\" style=\"width: {:.0}%\"></div></div>\n</div>\n",
        bar_class(s.efficiency_pct),
        s.efficiency_pct.clamp(0.0, 100.0)
    ));
    html
}

fn section(title: &str, body: &str) -> String {
    format!(
        "<div class=\"section\">\n    <h2 class=\"section-title\">{}</h2>\n    {}\n</div>\n",
        title, body
    )
}

fn legend(series: &[Series]) -> String {
    let items: String = series
        .iter()
        .map(|s| {
            format!(
                "<span class=\"legend-item\"><span class=\"swatch\" style=\"background: {}\"></span>{}</span>",
                s.color,
                escape(s.name)
            )
        })
        .collect();
    format!("<div class=\"legend\">{}</div>", items)
}

fn date_labels(report: &DashboardReport) -> Vec<String> {
    report
        .daily
        .iter()
        .map(|d| d.date.format("%d %b").to_string())
        .collect()
}

fn render_time_series(report: &DashboardReport) -> String {
    let labels = date_labels(report);

    let volume = [
        Series {
            name: "Total Input",
            color: INPUT_COLOR,
            values: report.daily.iter().map(|d| Some(d.total_input)).collect(),
        },
        Series {
            name: "Total Output",
            color: OUTPUT_COLOR,
            values: report.daily.iter().map(|d| Some(d.total_output)).collect(),
        },
    ];
    let aht = [Series {
        name: "Avg AHT (s)",
        color: AHT_COLOR,
        values: report.daily.iter().map(|d| d.mean_aht).collect(),
    }];
    let latency = [Series {
        name: "Avg Latency (s)",
        color: LATENCY_COLOR,
        values: report.daily.iter().map(|d| d.mean_latency).collect(),
    }];

    let mut html = section(
        "📈 Input vs Output",
        &format!(
            "{}{}",
            legend(&volume),
            svg::line_chart("Input vs output by day", &labels, &volume, &Overlay::default())
        ),
    );
    html.push_str(&section(
        "⏱️ Average Handle Time",
        &svg::line_chart("AHT by day", &labels, &aht, &Overlay::default()),
    ));
    html.push_str(&section(
        "📶 Average Latency",
        &svg::line_chart("Latency by day", &labels, &latency, &Overlay::default()),
    ));
    html
}

fn render_queues(report: &DashboardReport) -> String {
    let labels: Vec<String> = report.queues.iter().map(|q| q.queue.clone()).collect();
    let series = [
        Series {
            name: "Total Input",
            color: INPUT_COLOR,
            values: report.queues.iter().map(|q| Some(q.total_input)).collect(),
        },
        Series {
            name: "Total Output",
            color: OUTPUT_COLOR,
            values: report.queues.iter().map(|q| Some(q.total_output)).collect(),
        },
    ];
    section(
        "🗂️ Queue Comparison",
        &format!(
            "{}{}",
            legend(&series),
            svg::bar_chart("Input and output by queue", &labels, &series)
        ),
    )
}

fn render_anomalies(report: &DashboardReport) -> String {
    let a = &report.anomalies;
    let labels: Vec<String> = a
        .days
        .iter()
        .map(|d| d.daily.date.format("%d %b").to_string())
        .collect();

    let aht_flags: Vec<usize> = a
        .days
        .iter()
        .enumerate()
        .filter(|(_, d)| d.aht_anomaly)
        .map(|(i, _)| i)
        .collect();
    let latency_flags: Vec<usize> = a
        .days
        .iter()
        .enumerate()
        .filter(|(_, d)| d.latency_anomaly)
        .map(|(i, _)| i)
        .collect();

    let aht = [Series {
        name: "Avg AHT (s)",
        color: AHT_COLOR,
        values: a.days.iter().map(|d| d.daily.mean_aht).collect(),
    }];
    let latency = [Series {
        name: "Avg Latency (s)",
        color: LATENCY_COLOR,
        values: a.days.iter().map(|d| d.daily.mean_latency).collect(),
    }];

    let body = format!(
        r#"<p class="note">Days above the p{:.0} of the selected window are marked in red.</p>
    <div class="panels">
        <div class="panel"><h3>AHT &middot; threshold {}s &middot; {} flagged</h3>{}</div>
        <div class="panel"><h3>Latency &middot; threshold {}s &middot; {} flagged</h3>{}</div>
    </div>"#,
        a.percentile * 100.0,
        format_opt(a.aht_threshold),
        aht_flags.len(),
        svg::line_chart(
            "AHT anomalies",
            &labels,
            &aht,
            &Overlay {
                threshold: a.aht_threshold,
                flagged: &aht_flags,
            }
        ),
        format_opt(a.latency_threshold),
        latency_flags.len(),
        svg::line_chart(
            "Latency anomalies",
            &labels,
            &latency,
            &Overlay {
                threshold: a.latency_threshold,
                flagged: &latency_flags,
            }
        ),
    );
    section("🚨 Anomalies", &body)
}

fn render_attendance(report: &DashboardReport) -> String {
    let status_labels: Vec<String> = report
        .status_counts
        .iter()
        .map(|s| s.status.clone())
        .collect();
    let statuses = [Series {
        name: "Records",
        color: INPUT_COLOR,
        values: report
            .status_counts
            .iter()
            .map(|s| Some(s.count as f64))
            .collect(),
    }];

    let day_labels: Vec<String> = report
        .presence
        .iter()
        .map(|p| p.date.format("%d %b").to_string())
        .collect();
    let present = [Series {
        name: "Present",
        color: OUTPUT_COLOR,
        values: report
            .presence
            .iter()
            .map(|p| Some(f64::from(p.total_present)))
            .collect(),
    }];

    let mut html = section(
        "🧾 Status Distribution",
        &svg::bar_chart("Attendance records by status", &status_labels, &statuses),
    );
    html.push_str(&section(
        "👥 Daily Present Count",
        &svg::line_chart("Employees present by day", &day_labels, &present, &Overlay::default()),
    ));
    html
}

fn render_correlation(report: &DashboardReport) -> String {
    let points: Vec<(f64, f64)> = report
        .correlation
        .iter()
        .map(|c| (f64::from(c.total_present), c.total_output))
        .collect();
    let fit = linear_fit(&points);

    let caption = match &fit {
        Some(fit) => {
            let r = fit.r.map(|r| format!(" (r = {:.2})", r)).unwrap_or_default();
            format!("<p class=\"note\">Trend: <code>{}</code>{}</p>", fit.equation(), r)
        }
        None => "<p class=\"note\">Not enough variation in head-count to fit a trend.</p>"
            .to_string(),
    };

    section(
        "🔗 Head-count vs Output",
        &format!(
            "{}{}",
            caption,
            svg::scatter("Employees present vs total output", &points, fit.as_ref())
        ),
    )
}

fn render_footer() -> String {
    r#"<div class="footer">
    <p>Generated by ccdash</p>
</div>
"#
    .to_string()
}

fn bar_class(efficiency: f64) -> &'static str {
    if efficiency >= 90.0 {
        "bar-good"
    } else if efficiency >= 75.0 {
        "bar-moderate"
    } else {
        "bar-poor"
    }
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --primary-color: #6366f1;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --card-background: white;
    --border-color: #e2e8f0;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: var(--text-color);
    background: var(--background-color);
    padding: 2rem;
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    background: var(--card-background);
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    overflow: hidden;
}

.header {
    background: linear-gradient(135deg, #6366f1 0%, #0ea5e9 100%);
    color: white;
    padding: 2.5rem 2rem;
    text-align: center;
}

.header h1 { font-size: 2.25rem; margin-bottom: 0.5rem; }
.header .period { font-size: 1.1rem; }
.header .timestamp { opacity: 0.9; font-size: 0.9rem; }

.content { padding: 2rem; }

.warning {
    background: #fef3c7;
    border: 1px solid #f59e0b;
    border-radius: 8px;
    padding: 0.75rem 1rem;
    margin-bottom: 1rem;
}

.section { margin-bottom: 2rem; }
.section-title {
    font-size: 1.4rem;
    margin-bottom: 1rem;
    padding-bottom: 0.5rem;
    border-bottom: 2px solid var(--border-color);
}

.metrics-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    gap: 1rem;
    margin-bottom: 1rem;
}

.metric-card {
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 1.25rem;
}

.metric-card h3 {
    font-size: 0.8rem;
    color: #64748b;
    margin-bottom: 0.5rem;
    text-transform: uppercase;
}

.metric-value { font-size: 1.8rem; font-weight: bold; }

.metric-bar {
    height: 8px;
    background: #e2e8f0;
    border-radius: 4px;
    overflow: hidden;
}

.metric-bar-fill { height: 100%; border-radius: 4px; }
.bar-good { background: #10b981; }
.bar-moderate { background: #f59e0b; }
.bar-poor { background: #ef4444; }

.chart { width: 100%; height: auto; }
.chart .tick { font-size: 11px; fill: #64748b; }

.legend { display: flex; gap: 1rem; margin-bottom: 0.5rem; font-size: 0.875rem; }
.legend-item { display: flex; align-items: center; gap: 0.35rem; }
.swatch { width: 12px; height: 12px; border-radius: 2px; display: inline-block; }

.panels {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
    gap: 1rem;
}
.panel h3 { font-size: 0.95rem; color: #475569; margin-bottom: 0.25rem; }

.note { color: #64748b; font-size: 0.9rem; margin-bottom: 0.5rem; }
.empty { color: #94a3b8; font-style: italic; }

.footer {
    text-align: center;
    padding: 1.5rem;
    color: #64748b;
    font-size: 0.875rem;
    border-top: 1px solid var(--border-color);
}

@media (max-width: 768px) {
    body { padding: 1rem; }
    .header h1 { font-size: 1.6rem; }
}
"#;
