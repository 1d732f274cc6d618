//! Percentile-based anomaly flagging over daily means
//!
//! The threshold is recomputed from whatever days are in view, so an
//! "anomaly" is relative to the filtered window rather than to a fixed
//! historical baseline.

use crate::models::{AnomalyLabel, AnomalyRecord, AnomalyReport, DailyAggregate};

/// Percentile used when none is configured
pub const DEFAULT_PERCENTILE: f64 = 0.95;

/// Quantile `q` (0..=1) of `values` with linear interpolation between the
/// two closest ranks. Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 1.0);
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Percentile of the non-missing values of a series
fn threshold(series: impl Iterator<Item = Option<f64>>, q: f64) -> Option<f64> {
    let values: Vec<f64> = series.flatten().collect();
    percentile(&values, q)
}

/// Strictly above the threshold. Missing values and missing thresholds never flag.
fn exceeds(value: Option<f64>, threshold: Option<f64>) -> bool {
    matches!((value, threshold), (Some(v), Some(t)) if v > t)
}

/// Flag days whose mean AHT or latency is above the `q` percentile of the
/// days in view.
pub fn flag_anomalies(daily: &[DailyAggregate], q: f64) -> AnomalyReport {
    let aht_threshold = threshold(daily.iter().map(|d| d.mean_aht), q);
    let latency_threshold = threshold(daily.iter().map(|d| d.mean_latency), q);

    let days = daily
        .iter()
        .map(|day| {
            let aht_anomaly = exceeds(day.mean_aht, aht_threshold);
            let latency_anomaly = exceeds(day.mean_latency, latency_threshold);
            AnomalyRecord {
                daily: day.clone(),
                aht_anomaly,
                latency_anomaly,
                aht_label: AnomalyLabel::from_flag(aht_anomaly),
                latency_label: AnomalyLabel::from_flag(latency_anomaly),
            }
        })
        .collect();

    AnomalyReport {
        percentile: q,
        aht_threshold,
        latency_threshold,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(n: u32, aht: Option<f64>, latency: Option<f64>) -> DailyAggregate {
        DailyAggregate {
            date: NaiveDate::from_ymd_opt(2025, 1, n).unwrap(),
            total_input: 0.0,
            total_output: 0.0,
            mean_aht: aht,
            mean_latency: latency,
        }
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.5), Some(3.0));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(5.0));
        // rank = 0.95 * 4 = 3.8 -> 4 + 0.8 * (5 - 4)
        let p95 = percentile(&values, 0.95).unwrap();
        assert!((p95 - 4.8).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_unsorted_and_single() {
        assert_eq!(percentile(&[5.0, 1.0, 3.0], 0.5), Some(3.0));
        assert_eq!(percentile(&[7.0], 0.95), Some(7.0));
        assert_eq!(percentile(&[], 0.95), None);
    }

    #[test]
    fn test_flagging_is_strictly_greater() {
        // Single day: value equals its own threshold, so it is not flagged
        let report = flag_anomalies(&[day(1, Some(10.0), Some(1.0))], 0.95);
        assert_eq!(report.aht_threshold, Some(10.0));
        assert!(!report.days[0].aht_anomaly);
        assert_eq!(report.days[0].aht_label, AnomalyLabel::Normal);

        // All ties: nothing can exceed the threshold
        let flat: Vec<_> = (1..=10).map(|n| day(n, Some(5.0), Some(5.0))).collect();
        let report = flag_anomalies(&flat, 0.95);
        assert_eq!(report.aht_anomalies(), 0);
        assert_eq!(report.latency_anomalies(), 0);
    }

    #[test]
    fn test_at_most_five_percent_flagged_without_ties() {
        let days: Vec<_> = (1..=28)
            .map(|n| day(n, Some(n as f64 * 3.0), Some(100.0 - n as f64)))
            .collect();
        let report = flag_anomalies(&days, 0.95);
        let limit = (days.len() as f64 * 0.05).ceil() as usize;
        assert!(report.aht_anomalies() >= 1);
        assert!(report.aht_anomalies() <= limit);
        assert!(report.latency_anomalies() <= limit);

        // The largest AHT day is the one flagged
        let last = report.days.last().unwrap();
        assert!(last.aht_anomaly);
        assert_eq!(last.aht_label, AnomalyLabel::Anomaly);
    }

    #[test]
    fn test_missing_values_are_normal_and_excluded_from_threshold() {
        let days = vec![
            day(1, Some(10.0), None),
            day(2, None, None),
            day(3, Some(30.0), None),
        ];
        let report = flag_anomalies(&days, 0.95);
        // rank = 0.95 * 1 -> 10 + 0.95 * 20
        assert!((report.aht_threshold.unwrap() - 29.0).abs() < 1e-9);
        assert!(report.days[2].aht_anomaly);
        assert!(!report.days[1].aht_anomaly);
        assert_eq!(report.latency_threshold, None);
        assert_eq!(report.latency_anomalies(), 0);
    }

    #[test]
    fn test_threshold_follows_window() {
        let all: Vec<_> = (1..=20).map(|n| day(n, Some(n as f64), None)).collect();
        let wide = flag_anomalies(&all, 0.95);
        let narrow = flag_anomalies(&all[..10], 0.95);
        assert!(narrow.aht_threshold.unwrap() < wide.aht_threshold.unwrap());
    }
}
