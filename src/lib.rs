//! ccdash - contact-center KPI and attendance dashboard
//!
//! Reads a daily KPI export and an attendance roster, then builds the tidy
//! tables behind the dashboard: daily volumes and means, queue totals,
//! percentile anomalies, status distribution, daily head-count and the
//! head-count vs. output join.
//!
//! ```no_run
//! use ccdash::filter::Selection;
//! use ccdash::loader::{load_attendance, load_kpi};
//! use ccdash::pipeline::Dashboard;
//! use std::path::Path;
//!
//! let kpi = load_kpi(Path::new("RAW KPI metric.csv"), 2025)?;
//! let roster = load_attendance(Path::new("Raw Attandance.csv"), 2025)?;
//! let report = Dashboard::new().build(&kpi, &roster, &Selection::default());
//! println!("{:.2}% efficiency", report.summary.efficiency_pct);
//! # Ok::<(), ccdash::loader::LoadError>(())
//! ```

pub mod aggregate;
pub mod anomaly;
pub mod attendance;
pub mod cache;
pub mod cli;
pub mod config;
pub mod correlate;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod reporters;
