//! Session file discovery and metadata.
//!
//! A session corresponds to a single JSONL file. Its start time comes from,
//! in order: the `session_meta` header, a timestamp in the file name, the
//! file's modification time, and finally midnight of its directory date.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use tracing::warn;

use crate::error::Result;
use crate::model::{SessionMeta, Turn};
use crate::parser::{read_session_meta, SessionParser};

use super::paths::parse_filename_timestamp;

/// Where a session's start timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// The `session_meta` header record.
    SessionMeta,
    /// A timestamp embedded in the file name.
    FileName,
    /// The file's modification time.
    Modified,
    /// Midnight of the directory date.
    DirectoryDate,
}

/// A session log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    path: PathBuf,
    file_name: String,
    start: DateTime<Local>,
    timestamp_source: TimestampSource,
    cwd: Option<String>,
}

impl SessionEntry {
    /// Build a session entry for a file inside the day directory of `date`.
    ///
    /// An unreadable header only drops the header-based fields.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>, date: NaiveDate) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let meta = match read_session_meta(&path) {
            Ok(meta) => meta.unwrap_or_default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read session header");
                SessionMeta::default()
            }
        };

        let (start, timestamp_source) = resolve_start(&path, &file_name, date, &meta);

        Self {
            path,
            file_name,
            start,
            timestamp_source,
            cwd: meta.cwd,
        }
    }

    /// Path to the JSONL file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Session start time.
    #[must_use]
    pub fn start_timestamp(&self) -> DateTime<Local> {
        self.start
    }

    /// Which fallback produced the start time.
    #[must_use]
    pub fn timestamp_source(&self) -> TimestampSource {
        self.timestamp_source
    }

    /// Working directory recorded in the session header.
    #[must_use]
    pub fn cwd(&self) -> Option<&str> {
        self.cwd.as_deref()
    }

    /// Human time of day, e.g. `14:32:05`.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.start.format("%H:%M:%S").to_string()
    }

    /// List row label: time, file name and working directory name.
    #[must_use]
    pub fn label(&self) -> String {
        let cwd_name = self
            .cwd
            .as_deref()
            .and_then(|cwd| Path::new(cwd).file_name())
            .map(|n| format!(" - {}", n.to_string_lossy()))
            .unwrap_or_default();
        format!("{} - {}{cwd_name}", self.display_label(), self.file_name)
    }

    /// Parse all turns of this session.
    pub fn parse(&self) -> Result<Vec<Turn>> {
        SessionParser::new().parse_file(&self.path)
    }
}

fn resolve_start(
    path: &Path,
    file_name: &str,
    date: NaiveDate,
    meta: &SessionMeta,
) -> (DateTime<Local>, TimestampSource) {
    if let Some(ts) = meta.timestamp {
        return (ts.with_timezone(&Local), TimestampSource::SessionMeta);
    }

    if let Some(local) = parse_filename_timestamp(file_name, date).and_then(local_from_naive) {
        return (local, TimestampSource::FileName);
    }

    if let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) {
        return (DateTime::<Local>::from(modified), TimestampSource::Modified);
    }

    let midnight = local_from_naive(date.and_time(chrono::NaiveTime::MIN))
        .unwrap_or_else(|| Local.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    (midnight, TimestampSource::DirectoryDate)
}

fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&naive).earliest()
}
