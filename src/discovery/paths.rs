//! Sessions root discovery and session filename conventions.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CohistoryError, Result};
use crate::{CODEX_DIR_NAME, SESSIONS_DIR_NAME};

/// Environment variable pointing at the Codex home directory.
pub const CODEX_HOME_ENV: &str = "CODEX_HOME";

/// File extension of session logs.
pub const SESSION_EXTENSION: &str = "jsonl";

/// Discover the sessions root.
///
/// Checks locations in order:
/// 1. `$CODEX_HOME/sessions`
/// 2. `~/.codex/sessions`
///
/// The returned path is not checked for existence; opening a
/// [`SessionStore`](super::SessionStore) does that.
pub fn discover_sessions_root() -> Result<PathBuf> {
    if let Ok(codex_home) = std::env::var(CODEX_HOME_ENV) {
        if !codex_home.trim().is_empty() {
            return Ok(PathBuf::from(codex_home).join(SESSIONS_DIR_NAME));
        }
    }

    let home = home_directory().ok_or_else(|| {
        CohistoryError::not_found(PathBuf::from("~").join(CODEX_DIR_NAME).join(SESSIONS_DIR_NAME))
    })?;

    Ok(home.join(CODEX_DIR_NAME).join(SESSIONS_DIR_NAME))
}

/// Get the user's home directory.
pub fn home_directory() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Whether a path names a visible `.jsonl` file.
#[must_use]
pub fn is_session_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    path.extension().and_then(|e| e.to_str()) == Some(SESSION_EXTENSION) && path.is_file()
}

/// Whether a directory entry name is hidden.
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Parse a numeric path component (`2024`, `05`, `1`).
#[must_use]
pub fn parse_numeric_component(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Extract a local start time from a session filename.
///
/// Recognised forms:
/// - `rollout-2025-01-02T03-04-05-<id>.jsonl` (full date and time)
/// - `09-00-00.jsonl`, `09-00-00-<suffix>.jsonl` (time of day, combined with `date`)
#[must_use]
pub fn parse_filename_timestamp(file_name: &str, date: NaiveDate) -> Option<NaiveDateTime> {
    let stem = file_name
        .strip_suffix(".jsonl")
        .unwrap_or(file_name);

    if let Some(rest) = stem.strip_prefix("rollout-") {
        let candidate = rest.get(..19)?;
        return NaiveDateTime::parse_from_str(candidate, "%Y-%m-%dT%H-%M-%S").ok();
    }

    let time_part = match stem.get(..8) {
        Some(head) if stem.len() == 8 => head,
        Some(head) if matches!(stem.as_bytes().get(8), Some(b'-' | b'_')) => head,
        _ => return None,
    };

    NaiveTime::parse_from_str(time_part, "%H-%M-%S")
        .ok()
        .map(|time| date.and_time(time))
}
