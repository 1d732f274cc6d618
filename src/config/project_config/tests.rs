use super::*;

#[test]
fn test_default_config() {
    let config = ProjectConfig::default();
    assert_eq!(config.year(), 2025);
    assert!((config.percentile() - 0.95).abs() < f64::EPSILON);
    assert!(config.presence_rule().is_present("P10"));
    assert_eq!(config.kpi_path(), PathBuf::from(DEFAULT_KPI_FILE));
    assert_eq!(config.attendance_path(), PathBuf::from(DEFAULT_ATTENDANCE_FILE));
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_toml_config() {
    let toml_content = r#"
[sources]
kpi = "data/kpi.csv"
attendance = "/abs/roster.csv"
year = 2024

[attendance]
present_codes = ["WFH", "P1"]

[anomaly]
percentile = 0.9

[defaults]
format = "json"
queues = ["Inbound", "Email"]
dates = ["2024-03-01", "2024-03-15"]
no_color = true
"#;

    let config: ProjectConfig = toml::from_str(toml_content).expect("parse project config");
    let config = config.with_base_dir("/work");

    assert_eq!(config.year(), 2024);
    assert!((config.percentile() - 0.9).abs() < f64::EPSILON);
    assert_eq!(config.kpi_path(), PathBuf::from("/work/data/kpi.csv"));
    assert_eq!(config.attendance_path(), PathBuf::from("/abs/roster.csv"));

    let rule = config.presence_rule();
    assert!(rule.is_present("WFH"));
    assert!(!rule.is_present("S1"));

    assert_eq!(config.defaults.format.as_deref(), Some("json"));
    assert_eq!(
        config.defaults.queues,
        Some(vec!["Inbound".to_string(), "Email".to_string()])
    );
    assert_eq!(
        config.defaults.dates,
        Some(vec![
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ])
    );
    assert_eq!(config.defaults.no_color, Some(true));
}

#[test]
fn test_example_config_parses() {
    let config: ProjectConfig = toml::from_str(EXAMPLE_CONFIG).expect("parse example config");
    assert_eq!(config.year(), 2025);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_percentile_rejected() {
    let config: ProjectConfig =
        toml::from_str("[anomaly]\npercentile = 95.0\n").expect("parse project config");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPercentile(p)) if p == 95.0
    ));
}

#[test]
fn test_empty_present_codes_rejected() {
    let config: ProjectConfig =
        toml::from_str("[attendance]\npresent_codes = []\n").expect("parse project config");
    assert!(matches!(config.validate(), Err(ConfigError::EmptyPresentCodes)));
}

#[test]
fn test_load_project_config_prefers_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("ccdash.toml"), "[sources]\nyear = 2023\n").unwrap();
    std::fs::write(
        dir.path().join(".ccdashrc.json"),
        r#"{"sources": {"year": 2022}}"#,
    )
    .unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config.year(), 2023);
    assert_eq!(config.kpi_path(), dir.path().join(DEFAULT_KPI_FILE));
}

#[test]
fn test_load_project_config_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(".ccdashrc.json"),
        r#"{"sources": {"kpi": "k.csv"}, "anomaly": {"percentile": 0.8}}"#,
    )
    .unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config.kpi_path(), dir.path().join("k.csv"));
    assert!((config.percentile() - 0.8).abs() < f64::EPSILON);
}

#[test]
fn test_broken_discovered_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("ccdash.toml"), "this is [[ not valid toml").unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config.year(), 2025);
    assert_eq!(config.kpi_path(), dir.path().join(DEFAULT_KPI_FILE));
}

#[test]
fn test_unknown_default_format_rejected() {
    let config: ProjectConfig =
        toml::from_str("[defaults]\nformat = \"pdf\"\n").expect("parse project config");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidFormat(f)) if f == "pdf"
    ));

    let config: ProjectConfig =
        toml::from_str("[defaults]\nformat = \"md\"\n").expect("parse project config");
    assert!(config.validate().is_ok());
}

#[test]
fn test_discovered_config_with_unknown_format_falls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("ccdash.toml"),
        "[sources]\nyear = 2023\n\n[defaults]\nformat = \"pdf\"\n",
    )
    .unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config.year(), 2025);
    assert_eq!(config.defaults.format, None);
}

#[test]
fn test_explicit_config_errors_surface() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[anomaly]\npercentile = -1.0\n").unwrap();
    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::InvalidPercentile(_))
    ));

    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_config_file(&missing),
        Err(ConfigError::Read { .. })
    ));
}
