//! Listing commands.
//!
//! Print the date list and the session list of a date, as text rows
//! matching the browser or as JSON.

use std::io::Write;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use crate::cli::{Cli, DatesArgs, OutputFormat, SessionsArgs};
use crate::config::Config;
use crate::discovery::{DateEntry, SessionEntry, TimestampSource};
use crate::error::{CohistoryError, Result};

use super::open_store;

/// Run the dates command.
pub fn dates(cli: &Cli, config: &Config, args: &DatesArgs) -> Result<()> {
    let store = open_store(cli, config)?;
    let mut dates = store.list_dates()?;
    if let Some(limit) = args.limit {
        dates.truncate(limit);
    }

    let mut out = std::io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            let output: Vec<DateInfo> = dates.iter().map(DateInfo::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Text => {
            if dates.is_empty() {
                writeln!(out, "No sessions found in {}", store.root().display())?;
            }
            for date in &dates {
                writeln!(out, "{}", date.label())?;
            }
        }
    }
    Ok(())
}

/// Run the sessions command.
pub fn sessions(cli: &Cli, config: &Config, args: &SessionsArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let store = open_store(cli, config)?;
    let entry = store.find_date(date)?.ok_or_else(|| {
        CohistoryError::not_found(store.root().join(date.format("%Y/%m/%d").to_string()))
    })?;
    let sessions = store.list_sessions(&entry)?;

    let mut out = std::io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            let output: Vec<SessionInfo> = sessions.iter().map(SessionInfo::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Text => {
            for session in &sessions {
                writeln!(out, "{}", session.label())?;
            }
        }
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        CohistoryError::InvalidArgument {
            name: "date".to_string(),
            reason: format!("expected YYYY-MM-DD, got '{raw}': {e}"),
        }
    })
}

/// Date information for JSON output.
#[derive(Debug, Serialize)]
struct DateInfo {
    date: String,
    path: String,
    sessions: usize,
}

impl From<&DateEntry> for DateInfo {
    fn from(entry: &DateEntry) -> Self {
        Self {
            date: entry.iso(),
            path: entry.path().display().to_string(),
            sessions: entry.session_count(),
        }
    }
}

/// Session information for JSON output.
#[derive(Debug, Serialize)]
struct SessionInfo {
    file_name: String,
    path: String,
    start: DateTime<Local>,
    start_source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cwd: Option<String>,
}

impl From<&SessionEntry> for SessionInfo {
    fn from(entry: &SessionEntry) -> Self {
        Self {
            file_name: entry.file_name().to_string(),
            path: entry.path().display().to_string(),
            start: entry.start_timestamp(),
            start_source: match entry.timestamp_source() {
                TimestampSource::SessionMeta => "session_meta",
                TimestampSource::FileName => "file_name",
                TimestampSource::Modified => "modified",
                TimestampSource::DirectoryDate => "directory_date",
            },
            cwd: entry.cwd().map(str::to_string),
        }
    }
}
