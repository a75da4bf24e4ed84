//! Calendar dates that hold sessions.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// A calendar date with at least one session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateEntry {
    date: NaiveDate,
    path: PathBuf,
    session_count: usize,
}

impl DateEntry {
    /// Create a date entry for a day directory.
    #[must_use]
    pub fn new(date: NaiveDate, path: impl Into<PathBuf>, session_count: usize) -> Self {
        Self {
            date,
            path: path.into(),
            session_count,
        }
    }

    /// The calendar date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The day directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of session files in the day directory.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    /// `YYYY-MM-DD`.
    #[must_use]
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// List row label, e.g. `2024-05-01 (3 sessions)`.
    #[must_use]
    pub fn label(&self) -> String {
        let noun = if self.session_count == 1 {
            "session"
        } else {
            "sessions"
        };
        format!("{} ({} {noun})", self.iso(), self.session_count)
    }
}
