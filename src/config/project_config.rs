//! Project-level configuration support
//!
//! Loads configuration from `ccdash.toml` or `.ccdashrc.json` in the working
//! directory, or from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # ccdash.toml
//!
//! [sources]
//! kpi = "RAW KPI metric.csv"
//! attendance = "Raw Attandance.csv"
//! year = 2025
//!
//! [attendance]
//! present_codes = ["P1", "P2", "S1"]
//!
//! [anomaly]
//! percentile = 0.95
//!
//! [defaults]
//! format = "html"
//! queues = ["Inbound", "Email"]
//! dates = ["2025-01-01", "2025-01-31"]
//! ```
//!
//! Relative source paths resolve against the directory holding the config
//! file.

use crate::anomaly::DEFAULT_PERCENTILE;
use crate::attendance::PresenceRule;
use crate::loader::DEFAULT_YEAR;
use crate::reporters::OutputFormat;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Config files searched for, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["ccdash.toml", ".ccdashrc.json"];

/// KPI export name used when nothing is configured
pub const DEFAULT_KPI_FILE: &str = "RAW KPI metric.csv";

/// Attendance export name used when nothing is configured
pub const DEFAULT_ATTENDANCE_FILE: &str = "Raw Attandance.csv";

/// Written by `ccdash init`
pub const EXAMPLE_CONFIG: &str = r#"# ccdash configuration

[sources]
# KPI export: Date, Queue, Total Input, Total Output, AHT (s), Avg. Latency (s)
kpi = "RAW KPI metric.csv"
# Attendance roster: two preamble rows, then No, Employee, <Day-Mon>...
attendance = "Raw Attandance.csv"
# Year appended to Day-Mon labels
year = 2025

[attendance]
# Status codes counted as "worked that day"
# present_codes = ["P1", "P2", "P3", "P4", "P10", "S1", "S2", "S4", "S5", "S6", "S7", "M1", "M3", "M4", "M5", "M6", "M7"]

[anomaly]
# Days above this percentile of the visible window are flagged
percentile = 0.95

[defaults]
# format = "text"   # text, json, markdown, html
# queues = ["Inbound"]
# dates = ["2025-01-01", "2025-01-31"]
"#;

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("anomaly percentile must be between 0 and 1, got {0}")]
    InvalidPercentile(f64),

    #[error("attendance present_codes must not be empty")]
    EmptyPresentCodes,

    #[error("unknown default format '{0}' (expected text, json, markdown or html)")]
    InvalidFormat(String),
}

/// Where the data comes from
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SourcesConfig {
    #[serde(default)]
    pub kpi: Option<PathBuf>,

    #[serde(default)]
    pub attendance: Option<PathBuf>,

    /// Year appended to `Day-Mon` labels
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AttendanceConfig {
    /// Replaces the built-in worked-shift codes
    #[serde(default)]
    pub present_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AnomalyConfig {
    #[serde(default)]
    pub percentile: Option<f64>,
}

/// Default CLI flags
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown, html)
    #[serde(default)]
    pub format: Option<String>,

    /// Default queue selection
    #[serde(default)]
    pub queues: Option<Vec<String>>,

    /// Default date bounds (ISO dates)
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,

    /// Disable ANSI colors by default
    #[serde(default)]
    pub no_color: Option<bool>,
}

/// Project-level configuration loaded from ccdash.toml or similar
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub attendance: AttendanceConfig,

    #[serde(default)]
    pub anomaly: AnomalyConfig,

    #[serde(default)]
    pub defaults: CliDefaults,

    /// Directory relative source paths resolve against (not serialized)
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Year for day labels
    pub fn year(&self) -> i32 {
        self.sources.year.unwrap_or(DEFAULT_YEAR)
    }

    /// Anomaly percentile (0..=1)
    pub fn percentile(&self) -> f64 {
        self.anomaly.percentile.unwrap_or(DEFAULT_PERCENTILE)
    }

    /// Presence classification, configured codes or the built-in list
    pub fn presence_rule(&self) -> PresenceRule {
        match &self.attendance.present_codes {
            Some(codes) => PresenceRule::new(codes.iter().cloned()),
            None => PresenceRule::default(),
        }
    }

    /// KPI export path, resolved against the config directory
    pub fn kpi_path(&self) -> PathBuf {
        self.resolve(self.sources.kpi.as_deref(), DEFAULT_KPI_FILE)
    }

    /// Attendance export path, resolved against the config directory
    pub fn attendance_path(&self) -> PathBuf {
        self.resolve(self.sources.attendance.as_deref(), DEFAULT_ATTENDANCE_FILE)
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Reject values that would make the report meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(p) = self.anomaly.percentile {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidPercentile(p));
            }
        }
        if matches!(&self.attendance.present_codes, Some(codes) if codes.is_empty()) {
            return Err(ConfigError::EmptyPresentCodes);
        }
        if let Some(format) = &self.defaults.format {
            if OutputFormat::from_str(format).is_err() {
                return Err(ConfigError::InvalidFormat(format.clone()));
            }
        }
        Ok(())
    }

    fn resolve(&self, configured: Option<&Path>, fallback: &str) -> PathBuf {
        let path = configured.unwrap_or_else(|| Path::new(fallback));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Load project configuration from `dir`.
///
/// Searches for configuration files in this order:
/// 1. ccdash.toml
/// 2. .ccdashrc.json
///
/// A file that fails to load or validate is logged and skipped. Returns
/// defaults if no usable file is found.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default().with_base_dir(dir)
}

/// Load and validate one config file. JSON if the extension is `.json`,
/// TOML otherwise.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config: ProjectConfig = if is_json {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    };
    config.validate()?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(config.with_base_dir(base))
}

#[cfg(test)]
mod tests;
