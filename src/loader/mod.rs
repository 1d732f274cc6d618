//! CSV loaders for the KPI and attendance exports
//!
//! The KPI export is a plain table with a header row:
//!
//! ```text
//! Date,Queue,Total Input,Total Output,AHT (s),Avg. Latency (s)
//! 5-Jan,Inbound,120,110,"300,5","12,3"
//! ```
//!
//! The attendance export is a roster: two preamble rows (day names, then a
//! blank or label row), then a header row of `No, Employee, 1-Jan, 2-Jan, ...`
//! and one row per employee with a status code per day.

pub mod parse;

use crate::models::{AttendanceSheet, DayColumn, EmployeeRow, KpiRecord};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use parse::{non_blank, parse_day_label, parse_decimal, DEFAULT_YEAR};

/// Columns the KPI export must carry
pub const KPI_COLUMNS: [&str; 6] = [
    "Date",
    "Queue",
    "Total Input",
    "Total Output",
    "AHT (s)",
    "Avg. Latency (s)",
];

/// Preamble rows above the attendance header
pub const ATTENDANCE_PREAMBLE_ROWS: usize = 2;

/// Errors reading CSV content
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("no header row found after {0} preamble rows")]
    MissingHeader(usize),
}

/// Errors loading a source file, tagged with its path
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Open { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// KPI row exactly as written in the file, before coercion
#[derive(Debug, Deserialize)]
struct RawKpiRow {
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Queue", default)]
    queue: String,
    #[serde(rename = "Total Input", default)]
    total_input: String,
    #[serde(rename = "Total Output", default)]
    total_output: String,
    #[serde(rename = "AHT (s)", default)]
    aht: String,
    #[serde(rename = "Avg. Latency (s)", default)]
    latency: String,
}

impl RawKpiRow {
    fn coerce(self, year: i32) -> KpiRecord {
        KpiRecord {
            date: parse_day_label(&self.date, year),
            queue: self.queue.trim().to_string(),
            total_input: parse_decimal(&self.total_input),
            total_output: parse_decimal(&self.total_output),
            aht_secs: parse_decimal(&self.aht),
            latency_secs: parse_decimal(&self.latency),
        }
    }
}

/// Load the KPI export at `path`, appending `year` to its day labels.
pub fn load_kpi(path: &Path, year: i32) -> Result<Vec<KpiRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_kpi(file, year).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} KPI rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load the attendance roster at `path`, appending `year` to its day labels.
pub fn load_attendance(path: &Path, year: i32) -> Result<AttendanceSheet, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let sheet = read_attendance(file, year).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded {} employees x {} days from {}",
        sheet.employees.len(),
        sheet.days.len(),
        path.display()
    );
    Ok(sheet)
}

/// Parse KPI rows from any reader
pub fn read_kpi<R: Read>(reader: R, year: i32) -> Result<Vec<KpiRecord>, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in KPI_COLUMNS {
        if !headers.iter().any(|h| strip_bom(h) == column) {
            return Err(ParseError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut undated = 0usize;
    for row in rdr.deserialize::<RawKpiRow>() {
        let record = row?.coerce(year);
        if record.date.is_none() {
            undated += 1;
        }
        records.push(record);
    }
    if undated > 0 {
        debug!("{} KPI rows have an unparseable date label", undated);
    }
    Ok(records)
}

/// Parse the wide attendance roster from any reader
pub fn read_attendance<R: Read>(mut reader: R, year: i32) -> Result<AttendanceSheet, ParseError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let body = skip_lines(strip_bom(&content), ATTENDANCE_PREAMBLE_ROWS);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(ParseError::MissingHeader(ATTENDANCE_PREAMBLE_ROWS));
    }

    let days: Vec<DayColumn> = headers
        .iter()
        .skip(2)
        .map(|label| DayColumn {
            label: label.to_string(),
            date: parse_day_label(label, year),
        })
        .collect();

    let bad_labels = days.iter().filter(|d| d.date.is_none()).count();
    if bad_labels > 0 {
        debug!("{} attendance columns have an unparseable date label", bad_labels);
    }

    let mut employees = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let statuses = (0..days.len())
            .map(|i| row.get(i + 2).and_then(non_blank))
            .collect();
        employees.push(EmployeeRow {
            employee_id: row.get(0).unwrap_or_default().to_string(),
            employee_name: row.get(1).unwrap_or_default().to_string(),
            statuses,
        });
    }

    Ok(AttendanceSheet { days, employees })
}

fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{feff}')
}

/// Drop the first `n` lines of `content`
fn skip_lines(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}
