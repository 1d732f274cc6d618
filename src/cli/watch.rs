//! `ccdash watch` - rebuild the dashboard when a source file changes
//!
//! Watches the directories holding the two CSV exports and re-renders the
//! report whenever either file is written. Parsed sources stay cached, so
//! only the file that changed is read again.

use super::report;
use super::Settings;
use crate::cache::SourceCache;
use anyhow::{Context, Result};
use console::style;
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

pub fn run(settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    settings.kpi = std::fs::canonicalize(&settings.kpi)
        .with_context(|| format!("KPI file does not exist: {}", settings.kpi.display()))?;
    settings.attendance = std::fs::canonicalize(&settings.attendance).with_context(|| {
        format!(
            "Attendance file does not exist: {}",
            settings.attendance.display()
        )
    })?;
    if !settings.color {
        console::set_colors_enabled(false);
    }

    eprintln!(
        "\n{} {} and {} for changes...",
        style("Watching").bold(),
        style(settings.kpi.display()).cyan(),
        style(settings.attendance.display()).cyan()
    );
    eprintln!("  {} Press Ctrl+C to stop\n", style("→").dim());

    let cache = SourceCache::new();

    rerender(&settings, &cache);

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        None,
        move |result: DebounceEventResult| {
            if let Ok(events) = result {
                let _ = tx.send(events);
            }
        },
    )?;

    for dir in watch_dirs(&[settings.kpi.as_path(), settings.attendance.as_path()]) {
        debouncer
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Cannot watch {}", dir.display()))?;
        debug!("Watching directory {}", dir.display());
    }

    let sources = [settings.kpi.clone(), settings.attendance.clone()];
    let mut rebuilds = 0u32;

    // Main event loop
    while let Ok(events) = rx.recv() {
        let changed = touched_sources(events.iter().flat_map(|e| e.paths.iter()), &sources);
        if changed.is_empty() {
            continue;
        }

        let changed_refs: Vec<&Path> = changed.iter().map(PathBuf::as_path).collect();
        cache.invalidate(&changed_refs);
        for path in &changed {
            eprintln!(
                "{} {}",
                style("changed").yellow(),
                path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned()
                )
            );
        }

        rerender(&settings, &cache);
        rebuilds += 1;
        let (kpi_files, attendance_files) = cache.stats();
        debug!(
            "Rebuild {} done, cache holds {} KPI and {} attendance files",
            rebuilds, kpi_files, attendance_files
        );
    }

    eprintln!("\nRebuilt the dashboard {} times during watch session.", rebuilds);
    Ok(())
}

/// One render; a failure (e.g. a half-written file) is reported and the
/// watch keeps going.
fn rerender(settings: &Settings, cache: &SourceCache) {
    if let Err(e) = report::render_and_write(settings, cache) {
        warn!("Rebuild failed: {:#}", e);
        eprintln!("{} {:#}", style("error:").red().bold(), e);
    }
}

/// Distinct parent directories of the watched files
fn watch_dirs(files: &[&Path]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter_map(|f| f.parent())
        .map(Path::to_path_buf)
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

/// Which of `sources` appear among the event paths
fn touched_sources<'a>(
    event_paths: impl Iterator<Item = &'a PathBuf>,
    sources: &[PathBuf],
) -> Vec<PathBuf> {
    let hit: HashSet<&PathBuf> = event_paths.filter(|p| sources.contains(p)).collect();
    sources.iter().filter(|s| hit.contains(s)).cloned().collect()
}
