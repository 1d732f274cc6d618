//! CLI contract tests
//!
//! Runs the built binary against CSV fixtures in a temp directory and checks
//! output formats, filtering flags, config discovery and exit codes.

use std::path::Path;
use std::process::Command;

const KPI_CSV: &str = "\
Date,Queue,Total Input,Total Output,AHT (s),Avg. Latency (s)
1-Jan,Inbound,100,90,\"300,5\",\"12,3\"
2-Jan,Inbound,0,0,,
1-Jan,Email,50,40,200,30
3-Jan,Email,60,30,\"250,0\",\"40,5\"
bad-date,Email,999,999,1,1
";

const ATTENDANCE_CSV: &str = "\
,,Wed,Thu,Fri
,,,,
No,Employee,1-Jan,2-Jan,3-Jan
1,Alice,P1,S2,A
2,Budi,A,P10,
,,,,
";

fn ccdash_bin() -> &'static str {
    env!("CARGO_BIN_EXE_ccdash")
}

fn setup_sources() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("RAW KPI metric.csv"), KPI_CSV).unwrap();
    std::fs::write(dir.path().join("Raw Attandance.csv"), ATTENDANCE_CSV).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(ccdash_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("CCDASH_KPI")
        .env_remove("CCDASH_ATTENDANCE")
        .output()
        .expect("Failed to run ccdash");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn run_json(dir: &Path, extra_args: &[&str]) -> serde_json::Value {
    let mut args = vec!["report", "--format", "json"];
    args.extend_from_slice(extra_args);
    let (code, stdout, stderr) = run(dir, &args);
    assert_eq!(code, 0, "ccdash failed: {}", stderr);
    serde_json::from_str(&stdout).expect("Invalid JSON")
}

// ============================================================================
// Default run and formats
// ============================================================================

#[test]
fn test_default_command_finds_default_file_names() {
    let dir = setup_sources();
    let (code, stdout, _) = run(dir.path(), &["--log-level", "error"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Contact Center Dashboard"));
    assert!(stdout.contains("SUMMARY"));
}

#[test]
fn test_json_summary_over_full_span() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &[]);

    assert_eq!(v["summary"]["total_input"], 210.0);
    assert_eq!(v["summary"]["total_output"], 160.0);
    assert_eq!(v["selection"]["start"], "2025-01-01");
    assert_eq!(v["selection"]["end"], "2025-01-03");
    // The bad-date row is loaded but never shown
    assert_eq!(v["selection"]["rows_in"], 5);
    assert_eq!(v["selection"]["rows_out"], 4);
    assert_eq!(v["daily"].as_array().unwrap().len(), 3);
}

#[test]
fn test_json_attendance_views() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &[]);

    let presence = v["presence"].as_array().unwrap();
    assert_eq!(presence.len(), 3);
    assert_eq!(presence[0]["total_present"], 1); // Alice P1
    assert_eq!(presence[1]["total_present"], 2); // S2 + P10
    assert_eq!(presence[2]["total_present"], 0);

    // A appears twice; blank cells are not counted
    let statuses = v["status_counts"].as_array().unwrap();
    assert_eq!(statuses[0]["status"], "A");
    assert_eq!(statuses[0]["count"], 2);
    let total: u64 = statuses.iter().map(|s| s["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 5);

    let correlation = v["correlation"].as_array().unwrap();
    assert_eq!(correlation.len(), 3);
    assert_eq!(correlation[1]["total_present"], 2);
}

#[test]
fn test_markdown_format_alias() {
    let dir = setup_sources();
    let (code, stdout, _) = run(dir.path(), &["report", "-f", "md"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("# Contact Center Dashboard"));
    assert!(stdout.contains("| Inbound |") || stdout.contains("| Email |"));
}

#[test]
fn test_html_written_to_output_file() {
    let dir = setup_sources();
    let (code, stdout, _) = run(dir.path(), &["report", "-o", "out/dashboard.html"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Wrote html report"));

    let html = std::fs::read_to_string(dir.path().join("out/dashboard.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(!html.contains("\x1b["));
}

#[test]
fn test_no_color_text_has_no_ansi() {
    let dir = setup_sources();
    let (code, stdout, _) = run(dir.path(), &["report", "--no-color"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("\x1b["));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_date_range_filter() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &["--dates", "2025-01-02", "2025-01-03"]);
    assert_eq!(v["summary"]["total_input"], 60.0);
    assert_eq!(v["selection"]["start"], "2025-01-02");
    for day in v["daily"].as_array().unwrap() {
        let date = day["date"].as_str().unwrap();
        assert!(("2025-01-02"..="2025-01-03").contains(&date));
    }
}

#[test]
fn test_single_date_warns_and_keeps_all_rows() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &["--dates", "2025-01-02"]);
    assert_eq!(v["selection"]["rows_out"], 4);
    let warnings = v["selection"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("exactly two dates"));
}

#[test]
fn test_dates_flag_without_values_warns() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &["--dates"]);
    assert_eq!(v["selection"]["rows_out"], 4);
    let warnings = v["selection"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("got 0"));
}

#[test]
fn test_queue_filter() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &["--queue", "Email"]);
    assert_eq!(v["summary"]["total_input"], 110.0);
    let queues = v["queues"].as_array().unwrap();
    assert_eq!(queues.len(), 1);
    assert_eq!(queues[0]["queue"], "Email");
}

#[test]
fn test_unknown_queue_yields_empty_report_with_warning() {
    let dir = setup_sources();
    let v = run_json(dir.path(), &["--queue", "Chat"]);
    assert_eq!(v["selection"]["rows_out"], 0);
    assert_eq!(v["summary"]["efficiency_pct"], 0.0);
    assert_eq!(v["selection"]["warnings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_date_argument_rejected() {
    let dir = setup_sources();
    let (code, _, stderr) = run(dir.path(), &["report", "--dates", "1-Jan", "2-Jan"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("YYYY-MM-DD"));
}

// ============================================================================
// Config and errors
// ============================================================================

#[test]
fn test_missing_source_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run(dir.path(), &["report"]);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to load KPI data"));
}

#[test]
fn test_project_config_points_at_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/kpi.csv"), KPI_CSV).unwrap();
    std::fs::write(dir.path().join("data/roster.csv"), ATTENDANCE_CSV).unwrap();
    std::fs::write(
        dir.path().join("ccdash.toml"),
        r#"
[sources]
kpi = "data/kpi.csv"
attendance = "data/roster.csv"

[defaults]
queues = ["Inbound"]
"#,
    )
    .unwrap();

    let v = run_json(dir.path(), &[]);
    assert_eq!(v["summary"]["total_input"], 100.0);
    assert_eq!(v["selection"]["queues"][0], "Inbound");
}

#[test]
fn test_explicit_bad_config_is_fatal() {
    let dir = setup_sources();
    std::fs::write(dir.path().join("bad.toml"), "[anomaly]\npercentile = 2.0\n").unwrap();
    let (code, _, stderr) = run(dir.path(), &["--config", "bad.toml", "report"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("percentile"));
}

#[test]
fn test_discovered_bad_config_is_ignored() {
    let dir = setup_sources();
    std::fs::write(dir.path().join("ccdash.toml"), "not = [valid").unwrap();
    let (code, _, stderr) = run(dir.path(), &["report", "-f", "json"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Ignoring"));
}

#[test]
fn test_discovered_config_with_unknown_format_is_ignored() {
    let dir = setup_sources();
    std::fs::write(dir.path().join("ccdash.toml"), "[defaults]\nformat = \"pdf\"\n").unwrap();
    let (code, stdout, stderr) = run(dir.path(), &["report", "--no-color"]);
    assert_eq!(code, 0, "ccdash failed: {}", stderr);
    assert!(stderr.contains("Ignoring"));
    assert!(stdout.contains("SUMMARY"));
}

#[test]
fn test_percentile_flag_validated() {
    let dir = setup_sources();
    let (code, _, _) = run(dir.path(), &["report", "--percentile", "1.5"]);
    assert_ne!(code, 0);

    let v = run_json(dir.path(), &["--percentile", "0.5"]);
    assert_eq!(v["anomalies"]["percentile"], 0.5);
}

// ============================================================================
// Other commands
// ============================================================================

#[test]
fn test_queues_command_json() {
    let dir = setup_sources();
    let (code, stdout, _) = run(dir.path(), &["queues", "--json"]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(v["start"], "2025-01-01");
    assert_eq!(v["undated_rows"], 1);
    let queues: Vec<&str> = v["queues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["queue"].as_str().unwrap())
        .collect();
    assert_eq!(queues, vec!["Inbound", "Email"]);
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Created"));
    let written = std::fs::read_to_string(dir.path().join("ccdash.toml")).unwrap();
    assert!(written.contains("[sources]"));

    let (code, stdout, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Already initialized"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), &["version"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("ccdash "));
}
