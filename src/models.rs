//! Core data models for ccdash
//!
//! These models flow through the whole pipeline: the loader produces
//! [`KpiRecord`]s and [`AttendanceSheet`]s, the reshaper produces
//! [`AttendanceRecord`]s, and the aggregation stages produce the tidy
//! tables collected into a [`DashboardReport`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the KPI export.
///
/// Numeric fields are `None` when the source cell was blank or could not be
/// parsed. The date is `None` when the "Day-Mon" label was malformed; such
/// rows are dropped by the filter stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub date: Option<NaiveDate>,
    pub queue: String,
    pub total_input: Option<f64>,
    pub total_output: Option<f64>,
    /// Average handle time in seconds
    pub aht_secs: Option<f64>,
    /// Average latency in seconds
    pub latency_secs: Option<f64>,
}

/// A day column of the raw attendance sheet
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    /// Header label as it appears in the file (e.g. `5-Jan`)
    pub label: String,
    pub date: Option<NaiveDate>,
}

/// One employee row of the raw (wide) attendance sheet
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub employee_id: String,
    pub employee_name: String,
    /// One cell per [`DayColumn`], in column order. Blank cells are `None`.
    pub statuses: Vec<Option<String>>,
}

/// Raw attendance sheet: employees down, days across
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttendanceSheet {
    pub days: Vec<DayColumn>,
    pub employees: Vec<EmployeeRow>,
}

/// One (employee, day) attendance cell after reshaping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub present: bool,
}

/// Per-date KPI aggregate: volume sums and metric means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_input: f64,
    pub total_output: f64,
    pub mean_aht: Option<f64>,
    pub mean_latency: Option<f64>,
}

/// Input/output sums for a single queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueTotals {
    pub queue: String,
    pub total_input: f64,
    pub total_output: f64,
}

/// Number of attendance cells carrying a status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Number of employees present on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPresence {
    pub date: NaiveDate,
    pub total_present: u32,
}

/// Classification of a daily metric against its percentile threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnomalyLabel {
    #[default]
    Normal,
    Anomaly,
}

impl AnomalyLabel {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            AnomalyLabel::Anomaly
        } else {
            AnomalyLabel::Normal
        }
    }
}

impl std::fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyLabel::Normal => write!(f, "Normal"),
            AnomalyLabel::Anomaly => write!(f, "Anomaly"),
        }
    }
}

/// A daily aggregate with both metrics classified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    #[serde(flatten)]
    pub daily: DailyAggregate,
    pub aht_anomaly: bool,
    pub latency_anomaly: bool,
    pub aht_label: AnomalyLabel,
    pub latency_label: AnomalyLabel,
}

/// Anomaly view: per-day flags plus the thresholds that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnomalyReport {
    pub percentile: f64,
    pub aht_threshold: Option<f64>,
    pub latency_threshold: Option<f64>,
    pub days: Vec<AnomalyRecord>,
}

impl AnomalyReport {
    pub fn aht_anomalies(&self) -> usize {
        self.days.iter().filter(|d| d.aht_anomaly).count()
    }

    pub fn latency_anomalies(&self) -> usize {
        self.days.iter().filter(|d| d.latency_anomaly).count()
    }
}

/// KPI totals joined with the attendance head-count for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRow {
    pub date: NaiveDate,
    pub total_present: u32,
    pub total_input: f64,
    pub total_output: f64,
}

/// Headline metrics over the whole filtered KPI set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KpiSummary {
    pub total_input: f64,
    pub total_output: f64,
    pub mean_aht: Option<f64>,
    pub mean_latency: Option<f64>,
    /// Output / input x 100, zero when there was no input
    pub efficiency_pct: f64,
}

/// The filter actually applied to the KPI table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppliedSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub queues: Vec<String>,
    /// Queues present in the data that the user could pick from
    pub available_queues: Vec<String>,
    /// Earliest and latest KPI dates in the unfiltered data
    pub data_span: Option<(NaiveDate, NaiveDate)>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub warnings: Vec<String>,
}

/// Everything the presenter needs to render one dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardReport {
    pub selection: AppliedSelection,
    pub summary: KpiSummary,
    /// Input/output totals and metric means per day
    pub daily: Vec<DailyAggregate>,
    pub queues: Vec<QueueTotals>,
    pub anomalies: AnomalyReport,
    pub status_counts: Vec<StatusCount>,
    pub presence: Vec<DailyPresence>,
    pub correlation: Vec<CorrelationRow>,
}
