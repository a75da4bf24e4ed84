//! Session log discovery.
//!
//! Sessions live under a root directory as `<year>/<month>/<day>/*.jsonl`.
//! This module handles:
//! - Locating the sessions root
//! - Enumerating the dates that hold sessions, most recent first
//! - Enumerating the sessions of a date, most recent first
//!
//! Every listing is a point-in-time snapshot of the directory tree.

mod date;
mod paths;
mod session;

pub use date::*;
pub use paths::*;
pub use session::*;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::error::{CohistoryError, Result};

/// Read-only view over a sessions root.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Open a sessions root. Fails with `NotFound` when it does not exist.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CohistoryError::NotFound { path: root });
        }
        Ok(Self { root })
    }

    /// Open the auto-discovered sessions root.
    pub fn discover() -> Result<Self> {
        Self::open(discover_sessions_root()?)
    }

    /// Get the root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List dates holding at least one session, most recent first.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn list_dates(&self) -> Result<Vec<DateEntry>> {
        let mut dates = Vec::new();

        for (year, year_dir) in numeric_subdirs(&self.root)? {
            for (month, month_dir) in numeric_subdirs_lenient(&year_dir) {
                for (day, day_dir) in numeric_subdirs_lenient(&month_dir) {
                    let Some(date) = i32::try_from(year)
                        .ok()
                        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
                    else {
                        debug!(path = %day_dir.display(), "Skipping directory that is not a calendar date");
                        continue;
                    };

                    let count = match session_files(&day_dir) {
                        Ok(files) => files.len(),
                        Err(e) => {
                            warn!(path = %day_dir.display(), error = %e, "Cannot read day directory");
                            continue;
                        }
                    };

                    if count > 0 {
                        dates.push(DateEntry::new(date, day_dir, count));
                    }
                }
            }
        }

        dates.sort_by(|a, b| b.date().cmp(&a.date()));
        debug!(count = dates.len(), "Listed dates");
        Ok(dates)
    }

    /// Find the entry for a specific date.
    pub fn find_date(&self, date: NaiveDate) -> Result<Option<DateEntry>> {
        Ok(self.list_dates()?.into_iter().find(|d| d.date() == date))
    }

    /// List the sessions of a date, most recent first.
    #[instrument(skip(self, date), fields(date = %date.iso()))]
    pub fn list_sessions(&self, date: &DateEntry) -> Result<Vec<SessionEntry>> {
        let mut sessions: Vec<SessionEntry> = session_files(date.path())?
            .iter()
            .map(|path| SessionEntry::from_path(path, date.date()))
            .collect();

        sessions.sort_by(|a, b| {
            b.start_timestamp()
                .cmp(&a.start_timestamp())
                .then_with(|| b.file_name().cmp(a.file_name()))
        });
        debug!(count = sessions.len(), "Listed sessions");
        Ok(sessions)
    }
}

fn read_dir_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CohistoryError::not_found(dir)
        } else {
            CohistoryError::io(format!("Failed to read directory: {}", dir.display()), e)
        }
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to read directory entry"),
        }
    }
    Ok(paths)
}

/// Numeric, visible subdirectories of `dir`.
fn numeric_subdirs(dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    Ok(read_dir_paths(dir)?
        .into_iter()
        .filter(|p| !is_hidden(p) && p.is_dir())
        .filter_map(|p| parse_numeric_component(&p).map(|n| (n, p)))
        .collect())
}

/// Like [`numeric_subdirs`], but an unreadable directory yields nothing.
fn numeric_subdirs_lenient(dir: &Path) -> Vec<(u32, PathBuf)> {
    numeric_subdirs(dir).unwrap_or_else(|e| {
        warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
        Vec::new()
    })
}

/// Visible `.jsonl` files directly inside `dir`.
fn session_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_dir_paths(dir)?
        .into_iter()
        .filter(|p| is_session_file(p))
        .collect())
}
