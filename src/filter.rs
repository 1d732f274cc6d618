//! KPI filter stage: date range and queue selection
//!
//! Both filters compose with AND and apply to every downstream view.
//! A malformed date selection never fails the run; it is reported as a
//! [`FilterWarning`] and the date filter is skipped.

use crate::models::KpiRecord;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Non-fatal problems with the user's selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterWarning {
    #[error("date range needs exactly two dates (start and end), got {0}; date filter not applied")]
    InvalidRange(usize),

    #[error("queue '{0}' has no rows in the selected dates")]
    UnknownQueue(String),
}

/// What the user picked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Date bounds. `None` means the full data span. Exactly two bounds form
    /// an inclusive `[start, end]` range; any other count, including none,
    /// is rejected with a warning.
    pub dates: Option<Vec<NaiveDate>>,
    /// Queue labels to keep. `None` keeps every queue.
    pub queues: Option<Vec<String>>,
}

impl Selection {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            dates: Some(vec![start, end]),
            queues: None,
        }
    }

    pub fn with_queues<I, S>(mut self, queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queues = Some(queues.into_iter().map(Into::into).collect());
        self
    }
}

/// Output of the filter stage
#[derive(Debug, Clone, Default)]
pub struct Filtered {
    pub records: Vec<KpiRecord>,
    /// Inclusive bounds actually applied, `None` when the date filter was skipped
    pub range: Option<(NaiveDate, NaiveDate)>,
    /// Queues kept
    pub queues: Vec<String>,
    /// Queues present after the date filter, in order of first appearance
    pub available_queues: Vec<String>,
    pub warnings: Vec<FilterWarning>,
}

/// Earliest and latest dated KPI rows
pub fn date_span(records: &[KpiRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = records.iter().filter_map(|r| r.date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Distinct queue labels in order of first appearance
pub fn distinct_queues(records: &[KpiRecord]) -> Vec<String> {
    first_seen_queues(records)
}

fn first_seen_queues<'a>(records: impl IntoIterator<Item = &'a KpiRecord>) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.queue.as_str()))
        .map(|r| r.queue.clone())
        .collect()
}

/// Apply `selection` to the KPI rows. Undated rows never pass.
pub fn apply(records: &[KpiRecord], selection: &Selection) -> Filtered {
    let mut warnings = Vec::new();

    let range = match selection.dates.as_deref() {
        None => date_span(records),
        Some([start, end]) => Some((*start, *end)),
        Some(other) => {
            let warning = FilterWarning::InvalidRange(other.len());
            warn!("{}", warning);
            warnings.push(warning);
            None
        }
    };

    let dated: Vec<&KpiRecord> = records
        .iter()
        .filter(|r| match (r.date, range) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(d), Some((start, end))) => start <= d && d <= end,
        })
        .collect();

    let dropped_undated = records.iter().filter(|r| r.date.is_none()).count();
    if dropped_undated > 0 {
        debug!("Excluded {} KPI rows without a valid date", dropped_undated);
    }

    let available_queues = first_seen_queues(dated.iter().copied());

    let queues = match &selection.queues {
        Some(picked) => {
            for queue in picked {
                if !available_queues.contains(queue) {
                    let warning = FilterWarning::UnknownQueue(queue.clone());
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
            picked.clone()
        }
        None => available_queues.clone(),
    };

    let keep: HashSet<&str> = queues.iter().map(String::as_str).collect();
    let kept: Vec<KpiRecord> = dated
        .into_iter()
        .filter(|r| keep.contains(r.queue.as_str()))
        .cloned()
        .collect();

    debug!(
        "Filter kept {} of {} KPI rows ({} queues)",
        kept.len(),
        records.len(),
        queues.len()
    );

    Filtered {
        records: kept,
        range,
        queues,
        available_queues,
        warnings,
    }
}
