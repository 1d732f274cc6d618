//! Dashboard pipeline
//!
//! Orchestrates one full recompute:
//! 1. Reshape the attendance sheet and classify presence
//! 2. Filter the KPI rows by date range and queue
//! 3. Aggregate by date, queue and status
//! 4. Flag anomalies over the daily means
//! 5. Join daily totals with the daily head-count
//!
//! Attendance is not date-filtered; the status distribution and head-count
//! views always cover the whole roster.

use crate::aggregate;
use crate::anomaly::{self, DEFAULT_PERCENTILE};
use crate::attendance::{self, PresenceRule};
use crate::correlate::correlate;
use crate::filter::{self, Selection};
use crate::models::{AppliedSelection, AttendanceSheet, DashboardReport, KpiRecord};
use tracing::{debug, info};

/// Builds a [`DashboardReport`] from loaded sources.
pub struct Dashboard {
    presence: PresenceRule,
    percentile: f64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            presence: PresenceRule::default(),
            percentile: DEFAULT_PERCENTILE,
        }
    }

    /// Use a custom set of worked-shift codes.
    pub fn with_presence_rule(mut self, rule: PresenceRule) -> Self {
        self.presence = rule;
        self
    }

    /// Percentile (0..=1) used for the anomaly thresholds.
    pub fn with_percentile(mut self, q: f64) -> Self {
        self.percentile = q;
        self
    }

    /// Run the whole pipeline.
    pub fn build(
        &self,
        kpi: &[KpiRecord],
        sheet: &AttendanceSheet,
        selection: &Selection,
    ) -> DashboardReport {
        let roster = attendance::reshape(sheet, &self.presence);
        let presence = attendance::daily_present(&roster);
        let status_counts = aggregate::status_counts(&roster);
        debug!(
            "Reshaped {} attendance cells into {} days",
            roster.len(),
            presence.len()
        );

        let filtered = filter::apply(kpi, selection);
        let daily = aggregate::daily_aggregates(&filtered.records);
        let anomalies = anomaly::flag_anomalies(&daily, self.percentile);
        let correlation = correlate(&daily, &presence);

        let selection = AppliedSelection {
            start: filtered.range.map(|(start, _)| start),
            end: filtered.range.map(|(_, end)| end),
            queues: filtered.queues.clone(),
            available_queues: filtered.available_queues.clone(),
            data_span: filter::date_span(kpi),
            rows_in: kpi.len(),
            rows_out: filtered.records.len(),
            warnings: filtered.warnings.iter().map(ToString::to_string).collect(),
        };

        info!(
            "Dashboard built: {} days, {} AHT and {} latency anomalies",
            daily.len(),
            anomalies.aht_anomalies(),
            anomalies.latency_anomalies()
        );

        DashboardReport {
            selection,
            summary: aggregate::summarize(&filtered.records),
            queues: aggregate::totals_by_queue(&filtered.records),
            daily,
            anomalies,
            status_counts,
            presence,
            correlation,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
