//! Head-count vs. output join
//!
//! Anchored on KPI dates: every day with KPI data yields exactly one row,
//! with a head-count of zero when the roster has nothing for that day.

use crate::models::{CorrelationRow, DailyAggregate, DailyPresence};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Left-join daily KPI totals with daily present counts on date
pub fn correlate(daily: &[DailyAggregate], presence: &[DailyPresence]) -> Vec<CorrelationRow> {
    let present: HashMap<NaiveDate, u32> = presence
        .iter()
        .map(|p| (p.date, p.total_present))
        .collect();

    daily
        .iter()
        .map(|day| CorrelationRow {
            date: day.date,
            total_present: present.get(&day.date).copied().unwrap_or(0),
            total_input: day.total_input,
            total_output: day.total_output,
        })
        .collect()
}
