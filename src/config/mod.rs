//! Configuration module for ccdash
//!
//! This module handles:
//! - Project-level configuration (ccdash.toml / .ccdashrc.json)
//! - Source file locations and the year used for day labels
//! - Presence codes and anomaly percentile overrides
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_config_file,
    load_project_config,
    AnomalyConfig,
    AttendanceConfig,
    CliDefaults,
    ConfigError,
    ProjectConfig,
    SourcesConfig,
    CONFIG_FILE_NAMES,
    DEFAULT_ATTENDANCE_FILE,
    DEFAULT_KPI_FILE,
    EXAMPLE_CONFIG,
};
