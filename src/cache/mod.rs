//! Parsed-source caching
//!
//! Keeps the parsed KPI table and attendance sheet in memory between
//! recomputes so `watch` only re-reads a file when it actually changed.
//! Entries are validated against file size and modification time on every
//! lookup, and can also be dropped explicitly with [`SourceCache::invalidate`].

use crate::loader::{self, LoadError};
use crate::models::{AttendanceSheet, KpiRecord};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// File identity used to detect changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct Entry<T> {
    fingerprint: Fingerprint,
    year: i32,
    data: Arc<T>,
}

/// Thread-safe cache of parsed source files
#[derive(Clone)]
pub struct SourceCache {
    kpi: Arc<DashMap<PathBuf, Entry<Vec<KpiRecord>>>>,
    attendance: Arc<DashMap<PathBuf, Entry<AttendanceSheet>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self {
            kpi: Arc::new(DashMap::new()),
            attendance: Arc::new(DashMap::new()),
        }
    }

    /// KPI rows for `path`, re-read only if the file changed
    pub fn kpi(&self, path: &Path, year: i32) -> Result<Arc<Vec<KpiRecord>>, LoadError> {
        get_or_load(&self.kpi, path, year, loader::load_kpi)
    }

    /// Attendance sheet for `path`, re-read only if the file changed
    pub fn attendance(&self, path: &Path, year: i32) -> Result<Arc<AttendanceSheet>, LoadError> {
        get_or_load(&self.attendance, path, year, loader::load_attendance)
    }

    /// Cache stats: (kpi files, attendance files)
    pub fn stats(&self) -> (usize, usize) {
        (self.kpi.len(), self.attendance.len())
    }

    /// Drop any parsed copy of `changed_files` so the next lookup re-reads it
    pub fn invalidate(&self, changed_files: &[&Path]) {
        for path in changed_files {
            let kpi = self.kpi.remove(*path).is_some();
            let attendance = self.attendance.remove(*path).is_some();
            if kpi || attendance {
                debug!("Evicted {} from source cache", path.display());
            }
        }
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new()
    }
}

fn get_or_load<T>(
    map: &DashMap<PathBuf, Entry<T>>,
    path: &Path,
    year: i32,
    load: impl FnOnce(&Path, i32) -> Result<T, LoadError>,
) -> Result<Arc<T>, LoadError> {
    let fingerprint = Fingerprint::of(path)?;

    if let Some(entry) = map.get(path) {
        if entry.fingerprint == fingerprint && entry.year == year {
            debug!("Cache hit: {}", path.display());
            return Ok(Arc::clone(&entry.data));
        }
    }

    let data = Arc::new(load(path, year)?);
    map.insert(
        path.to_path_buf(),
        Entry {
            fingerprint,
            year,
            data: Arc::clone(&data),
        },
    );
    Ok(data)
}
