//! Grouped KPI and attendance views
//!
//! Sums skip missing cells; means skip missing cells and are `None` when a
//! group has no values at all.

use crate::models::{
    AttendanceRecord, DailyAggregate, KpiRecord, KpiSummary, QueueTotals, StatusCount,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Which per-contact metric to read from a KPI row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Aht,
    Latency,
}

impl Metric {
    fn of(&self, record: &KpiRecord) -> Option<f64> {
        match self {
            Metric::Aht => record.aht_secs,
            Metric::Latency => record.latency_secs,
        }
    }
}

/// Running mean that ignores missing values
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct DayAcc {
    input: f64,
    output: f64,
    aht: MeanAcc,
    latency: MeanAcc,
}

/// Sum input/output and average AHT/latency per date, in date order.
///
/// Undated rows are ignored.
pub fn daily_aggregates(records: &[KpiRecord]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();
    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        let acc = days.entry(date).or_default();
        acc.input += record.total_input.unwrap_or(0.0);
        acc.output += record.total_output.unwrap_or(0.0);
        acc.aht.push(Metric::Aht.of(record));
        acc.latency.push(Metric::Latency.of(record));
    }
    days.into_iter()
        .map(|(date, acc)| DailyAggregate {
            date,
            total_input: acc.input,
            total_output: acc.output,
            mean_aht: acc.aht.mean(),
            mean_latency: acc.latency.mean(),
        })
        .collect()
}

/// Sum input/output per queue, sorted by queue label
pub fn totals_by_queue(records: &[KpiRecord]) -> Vec<QueueTotals> {
    let mut queues: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = queues.entry(record.queue.as_str()).or_default();
        entry.0 += record.total_input.unwrap_or(0.0);
        entry.1 += record.total_output.unwrap_or(0.0);
    }
    queues
        .into_iter()
        .map(|(queue, (total_input, total_output))| QueueTotals {
            queue: queue.to_string(),
            total_input,
            total_output,
        })
        .collect()
}

/// Count attendance cells per status code, most frequent first.
///
/// Blank cells carry no status and are not counted. Ties sort by code.
pub fn status_counts(records: &[AttendanceRecord]) -> Vec<StatusCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for status in records.iter().filter_map(|r| r.status.as_deref()) {
        *counts.entry(status).or_default() += 1;
    }
    let mut out: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
    out
}

/// Output as a percentage of input; zero when there was no input
pub fn efficiency(total_input: f64, total_output: f64) -> f64 {
    if total_input == 0.0 {
        0.0
    } else {
        total_output / total_input * 100.0
    }
}

/// Headline metrics over the whole filtered set
pub fn summarize(records: &[KpiRecord]) -> KpiSummary {
    let mut total_input = 0.0;
    let mut total_output = 0.0;
    let mut aht = MeanAcc::default();
    let mut latency = MeanAcc::default();
    for record in records {
        total_input += record.total_input.unwrap_or(0.0);
        total_output += record.total_output.unwrap_or(0.0);
        aht.push(record.aht_secs);
        latency.push(record.latency_secs);
    }
    KpiSummary {
        total_input,
        total_output,
        mean_aht: aht.mean(),
        mean_latency: latency.mean(),
        efficiency_pct: efficiency(total_input, total_output),
    }
}
