//! Queues command - what can be selected

use crate::filter::{date_span, distinct_queues};
use crate::loader;
use anyhow::{Context, Result};
use console::style;
use std::collections::HashMap;
use std::path::Path;

/// Run the queues command
pub fn run(kpi: &Path, year: i32, json: bool) -> Result<()> {
    let records = loader::load_kpi(kpi, year).context("Failed to load KPI data")?;

    let queues = distinct_queues(&records);
    let mut rows: HashMap<&str, usize> = HashMap::new();
    for r in &records {
        *rows.entry(r.queue.as_str()).or_default() += 1;
    }
    let span = date_span(&records);
    let undated = records.iter().filter(|r| r.date.is_none()).count();

    if json {
        let value = serde_json::json!({
            "start": span.map(|(start, _)| start),
            "end": span.map(|(_, end)| end),
            "rows": records.len(),
            "undated_rows": undated,
            "queues": queues
                .iter()
                .map(|q| serde_json::json!({ "queue": q, "rows": rows.get(q.as_str()).copied().unwrap_or(0) }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match span {
        Some((start, end)) => println!(
            "{} {} to {}",
            style("Dates:").bold(),
            style(start).cyan(),
            style(end).cyan()
        ),
        None => println!("{} none", style("Dates:").bold()),
    }
    if undated > 0 {
        println!(
            "  {}",
            style(format!("{} rows have an unreadable date and are never shown", undated)).dim()
        );
    }
    println!("{} ({})", style("Queues").bold(), queues.len());
    for q in &queues {
        println!(
            "  {:<28} {}",
            q,
            style(format!("{} rows", rows.get(q.as_str()).copied().unwrap_or(0))).dim()
        );
    }
    Ok(())
}
