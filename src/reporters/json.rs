//! JSON reporter
//!
//! Outputs the full DashboardReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::models::DashboardReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["selection"]["start"], "2025-01-01");
        assert_eq!(parsed["daily"].as_array().expect("daily array").len(), 7);
        // Flattened anomaly rows carry the daily fields next to the labels
        let first = &parsed["anomalies"]["days"][0];
        assert_eq!(first["date"], "2025-01-01");
        assert_eq!(first["aht_label"], "Normal");
    }

    #[test]
    fn test_json_round_trips() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let back: DashboardReport = serde_json::from_str(&json_str).expect("parse report");
        assert_eq!(back.summary, report.summary);
        assert_eq!(back.correlation, report.correlation);
    }

    #[test]
    fn test_missing_means_are_null() {
        let report = test_report();
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        // Day 7 has no AHT or latency samples
        assert!(parsed["daily"][6]["mean_aht"].is_null());
    }
}
