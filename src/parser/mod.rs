//! JSONL parsing for Codex session logs.
//!
//! The parser is a fold over lines: each line is classified on its own by
//! [`classify_line`] and a corrupt line never aborts the rest of the file.
//!
//! # Example
//!
//! ```rust,no_run
//! use cohistory::parser::SessionParser;
//!
//! let mut parser = SessionParser::new();
//! let turns = parser.parse_file("rollout.jsonl")?;
//! println!(
//!     "{} turns, {} malformed lines skipped",
//!     turns.len(),
//!     parser.stats().lines_malformed
//! );
//! # Ok::<(), cohistory::CohistoryError>(())
//! ```
//!
//! # Parsing Modes
//!
//! - **Lenient mode** (default): malformed lines are counted and skipped
//! - **Strict mode**: the first malformed line fails with `MalformedLine`

mod line;

use tracing::{debug, instrument, trace};

pub use line::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CohistoryError, Result};
use crate::model::{RolloutLine, SessionMeta, Turn};

/// Session file parser.
#[derive(Debug)]
pub struct SessionParser {
    /// Whether to skip malformed lines instead of failing.
    lenient: bool,
    /// Statistics about the last parse.
    stats: ParseStats,
}

/// Statistics about parsing operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Total lines processed.
    pub lines_processed: usize,
    /// Lines that produced a turn.
    pub turns_parsed: usize,
    /// Valid lines that are not rendered (tool calls, metadata, empty messages).
    pub lines_skipped: usize,
    /// Lines that were not valid JSON or could not be read.
    pub lines_malformed: usize,
    /// Blank lines.
    pub empty_lines: usize,
}

impl ParseStats {
    fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Turn { .. } => self.turns_parsed += 1,
            LineOutcome::Skip(SkipReason::Empty) => self.empty_lines += 1,
            LineOutcome::Skip(_) => self.lines_skipped += 1,
            LineOutcome::Malformed { .. } => self.lines_malformed += 1,
        }
    }
}

impl SessionParser {
    /// Create a new lenient parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lenient: true,
            stats: ParseStats::default(),
        }
    }

    /// Set lenient mode (skip malformed lines instead of failing).
    #[must_use]
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Get statistics of the last parse.
    #[must_use]
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse a session file.
    ///
    /// Fails with [`CohistoryError::SessionUnreadable`] only when the file
    /// cannot be opened.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Turn>> {
        let path = path.as_ref();
        debug!("Opening session for parsing");

        let file = File::open(path).map_err(|e| CohistoryError::SessionUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.parse_reader(BufReader::new(file))
    }

    /// Parse JSONL from a reader.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<Vec<Turn>> {
        let mut turns = Vec::new();
        self.stats = ParseStats::default();

        for (idx, line_result) in reader.lines().enumerate() {
            let line_num = idx + 1;
            self.stats.lines_processed += 1;

            let outcome = match line_result {
                Ok(line) => classify_line(&line),
                Err(e) => LineOutcome::Malformed {
                    message: format!("I/O error: {e}"),
                },
            };
            self.stats.record(&outcome);

            match outcome {
                LineOutcome::Turn {
                    role,
                    text,
                    timestamp,
                } => {
                    turns.push(Turn::new(turns.len(), role, text).with_timestamp(timestamp));
                }
                LineOutcome::Skip(reason) => {
                    trace!(line = line_num, ?reason, "Skipping line");
                }
                LineOutcome::Malformed { message } => {
                    if !self.lenient {
                        return Err(CohistoryError::MalformedLine {
                            line: line_num,
                            message,
                        });
                    }
                    trace!(line = line_num, error = %message, "Malformed line, skipping");
                }
            }
        }

        debug!(
            turns = turns.len(),
            lines = self.stats.lines_processed,
            malformed = self.stats.lines_malformed,
            "Parsing complete"
        );
        Ok(turns)
    }

    /// Parse JSONL from a string.
    pub fn parse_str(&mut self, content: &str) -> Result<Vec<Turn>> {
        self.parse_reader(content.as_bytes())
    }
}

impl Default for SessionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the `session_meta` header from the first line of a session file.
///
/// Returns `Ok(None)` when the first line is blank, malformed, or some
/// other record type.
pub fn read_session_meta(path: impl AsRef<Path>) -> Result<Option<SessionMeta>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CohistoryError::SessionUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut first_line = String::new();
    if BufReader::new(file).read_line(&mut first_line).is_err() {
        return Ok(None);
    }

    Ok(serde_json::from_str::<RolloutLine>(first_line.trim())
        .ok()
        .and_then(|record| record.session_meta()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    const USER: &str = r#"{"timestamp":"2025-01-01T00:00:01Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hello"}]}}"#;
    const ASSISTANT: &str = r#"{"timestamp":"2025-01-01T00:00:02Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"world"}]}}"#;
    const META: &str = r#"{"timestamp":"2025-01-01T00:00:00Z","type":"session_meta","payload":{"id":"abc","timestamp":"2025-01-01T00:00:00Z","cwd":"/tmp/x"}}"#;

    #[test]
    fn test_parse_empty() {
        let mut parser = SessionParser::new();
        let turns = parser.parse_str("").unwrap();
        assert!(turns.is_empty());
        assert_eq!(parser.stats().lines_processed, 0);
    }

    #[test]
    fn test_parse_conversation() {
        let content = [META, USER, ASSISTANT].join("\n");
        let mut parser = SessionParser::new();
        let turns = parser.parse_str(&content).unwrap();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].ordinal, 1);
        assert_eq!(parser.stats().lines_skipped, 1);
    }

    #[test]
    fn test_lenient_parsing() {
        let content = [USER, "invalid json line", ASSISTANT].join("\n");
        let mut parser = SessionParser::new();
        let turns = parser.parse_str(&content).unwrap();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].ordinal, 0);
        assert_eq!(turns[1].ordinal, 1);
        assert_eq!(parser.stats().lines_malformed, 1);
    }

    #[test]
    fn test_strict_parsing_fails_on_first_malformed_line() {
        let content = [USER, "{broken", ASSISTANT].join("\n");
        let mut parser = SessionParser::new().with_lenient(false);
        let err = parser.parse_str(&content).unwrap_err();
        assert!(matches!(err, CohistoryError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_parse_stats() {
        let content = format!("{USER}\n\n{META}\nbad\n{ASSISTANT}\n");
        let mut parser = SessionParser::new();
        let turns = parser.parse_str(&content).unwrap();
        let stats = parser.stats();

        assert_eq!(turns.len(), 2);
        assert_eq!(stats.lines_processed, 5);
        assert_eq!(stats.empty_lines, 1);
        assert_eq!(stats.lines_skipped, 1);
        assert_eq!(stats.lines_malformed, 1);
        assert_eq!(stats.turns_parsed, 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let mut bytes = USER.as_bytes().to_vec();
        bytes.extend_from_slice(b"\n\xff\xfe\n");
        bytes.extend_from_slice(ASSISTANT.as_bytes());

        let mut parser = SessionParser::new();
        let turns = parser.parse_reader(bytes.as_slice()).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(parser.stats().lines_malformed, 1);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let mut parser = SessionParser::new();
        let err = parser.parse_file("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, CohistoryError::SessionUnreadable { .. }));
    }

    #[test]
    fn test_read_session_meta() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.jsonl");
        std::fs::write(&path, format!("{META}\n{USER}\n")).unwrap();

        let meta = read_session_meta(&path).unwrap().unwrap();
        assert_eq!(meta.cwd.as_deref(), Some("/tmp/x"));

        let other = dir.path().join("o.jsonl");
        std::fs::write(&other, format!("{USER}\n")).unwrap();
        assert!(read_session_meta(&other).unwrap().is_none());
    }
}
