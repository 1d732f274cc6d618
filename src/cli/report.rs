//! Report command - build and render the dashboard once

use super::Settings;
use crate::cache::SourceCache;
use crate::models::DashboardReport;
use crate::pipeline::Dashboard;
use crate::reporters;
use anyhow::{Context, Result};
use console::style;
use tracing::info;

/// Load both sources through `cache` and build the dashboard
pub(crate) fn build(settings: &Settings, cache: &SourceCache) -> Result<DashboardReport> {
    let kpi = cache
        .kpi(&settings.kpi, settings.year)
        .context("Failed to load KPI data")?;
    let sheet = cache
        .attendance(&settings.attendance, settings.year)
        .context("Failed to load attendance data")?;

    Ok(Dashboard::new()
        .with_presence_rule(settings.presence.clone())
        .with_percentile(settings.percentile)
        .build(&kpi, &sheet, &settings.selection))
}

/// Render the dashboard and write it to the configured destination
pub(crate) fn render_and_write(settings: &Settings, cache: &SourceCache) -> Result<()> {
    let report = build(settings, cache)?;
    let content = reporters::report_with_format(&report, settings.format)?;

    match &settings.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} report to {}", settings.format, path.display());
            println!(
                "{} Wrote {} report to {}",
                style("✓").green(),
                settings.format,
                style(path.display()).cyan()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Run the report command
pub fn run(settings: &Settings) -> Result<()> {
    if !settings.color {
        console::set_colors_enabled(false);
    }
    render_and_write(settings, &SourceCache::new())
}
