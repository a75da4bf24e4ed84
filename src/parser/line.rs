//! Per-line classification.
//!
//! Every JSONL line is an independent unit of failure: it either yields a
//! turn, is skipped as something the viewer does not render, or is malformed.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{Role, RolloutLine};

/// Why a well-formed line produced no turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank or whitespace-only line.
    Empty,
    /// Valid JSON that is not a conversation message.
    NotAMessage,
    /// A message with no renderable text.
    NoText,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A renderable message.
    Turn {
        /// Author role.
        role: Role,
        /// Message body.
        text: String,
        /// Record timestamp.
        timestamp: Option<DateTime<Utc>>,
    },
    /// A line intentionally not rendered.
    Skip(SkipReason),
    /// A line that is not valid JSON.
    Malformed {
        /// Parser error message.
        message: String,
    },
}

/// Classify a single JSONL line.
#[must_use]
pub fn classify_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Skip(SkipReason::Empty);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            return LineOutcome::Malformed {
                message: e.to_string(),
            }
        }
    };

    if !value.is_object() {
        return LineOutcome::Skip(SkipReason::NotAMessage);
    }

    // Fields of the wrong JSON type make the shape unrecognisable, not malformed.
    let Ok(record) = serde_json::from_value::<RolloutLine>(value) else {
        return LineOutcome::Skip(SkipReason::NotAMessage);
    };

    let Some(message) = record.message() else {
        return LineOutcome::Skip(SkipReason::NotAMessage);
    };

    let text = message.text();
    if text.is_empty() {
        return LineOutcome::Skip(SkipReason::NoText);
    }

    LineOutcome::Turn {
        role: Role::from_raw(&message.role),
        text,
        timestamp: record.parsed_timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(classify_line("   \t"), LineOutcome::Skip(SkipReason::Empty));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            classify_line("{not json"),
            LineOutcome::Malformed { .. }
        ));
    }

    #[test]
    fn test_non_object_json() {
        assert_eq!(
            classify_line("[1,2,3]"),
            LineOutcome::Skip(SkipReason::NotAMessage)
        );
        assert_eq!(
            classify_line("\"just a string\""),
            LineOutcome::Skip(SkipReason::NotAMessage)
        );
    }

    #[test]
    fn test_wrong_field_types() {
        assert_eq!(
            classify_line(r#"{"type": 5, "role": ["user"]}"#),
            LineOutcome::Skip(SkipReason::NotAMessage)
        );
    }

    #[test]
    fn test_message_without_text() {
        let line = r#"{"type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"image","url":"x"}]}}"#;
        assert_eq!(classify_line(line), LineOutcome::Skip(SkipReason::NoText));
    }

    #[test]
    fn test_message_turn() {
        let line = r#"{"timestamp":"2025-01-01T00:00:02Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"world"}]}}"#;
        match classify_line(line) {
            LineOutcome::Turn {
                role,
                text,
                timestamp,
            } => {
                assert_eq!(role, Role::Assistant);
                assert_eq!(text, "world");
                assert!(timestamp.is_some());
            }
            other => panic!("expected a turn, got {other:?}"),
        }
    }

    #[test]
    fn test_session_meta_is_skipped() {
        let line = r#"{"type":"session_meta","payload":{"id":"x","cwd":"/tmp"}}"#;
        assert_eq!(
            classify_line(line),
            LineOutcome::Skip(SkipReason::NotAMessage)
        );
    }
}
