//! On-disk record shapes for Codex rollout files.
//!
//! Each line of a session file is one JSON object. The viewer understands
//! three shapes:
//! - `session_meta`: header record carrying the start time and working directory
//! - `response_item` whose payload is a `message`: a conversation turn
//! - flat `{"role": .., "content": ..}` records written by older tools
//!
//! Everything else (tool calls, reasoning, `event_msg`, `turn_context`) is
//! valid JSON the viewer deliberately ignores.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Record type of the session header line.
pub const SESSION_META_TYPE: &str = "session_meta";

/// Record type wrapping model inputs and outputs.
pub const RESPONSE_ITEM_TYPE: &str = "response_item";

/// Payload type of a conversation message.
pub const MESSAGE_TYPE: &str = "message";

/// Content part types that carry renderable text.
pub const TEXT_PART_TYPES: [&str; 3] = ["input_text", "output_text", "text"];

/// One JSONL record, before interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolloutLine {
    /// Record timestamp (RFC 3339).
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Record type (`session_meta`, `response_item`, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Type-specific payload.
    #[serde(default)]
    pub payload: Option<Value>,

    /// Role of a flat message record.
    #[serde(default)]
    pub role: Option<String>,

    /// Content of a flat message record.
    #[serde(default)]
    pub content: Option<Value>,
}

impl RolloutLine {
    /// Parsed record timestamp, if present and well-formed.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Whether this is the session header record.
    #[must_use]
    pub fn is_session_meta(&self) -> bool {
        self.kind.as_deref() == Some(SESSION_META_TYPE)
    }

    /// Interpret the record as a conversation message.
    ///
    /// Returns `None` for every shape the viewer does not render.
    #[must_use]
    pub fn message(&self) -> Option<MessageRecord> {
        match self.kind.as_deref() {
            Some(RESPONSE_ITEM_TYPE) => {
                let payload: MessagePayload =
                    serde_json::from_value(self.payload.clone()?).ok()?;
                if payload.kind.as_deref() != Some(MESSAGE_TYPE) {
                    return None;
                }
                Some(MessageRecord {
                    role: payload.role?,
                    content: payload.content.unwrap_or(Value::Null),
                })
            }
            None | Some(MESSAGE_TYPE) => Some(MessageRecord {
                role: self.role.clone()?,
                content: self.content.clone().unwrap_or(Value::Null),
            }),
            Some(_) => None,
        }
    }

    /// Interpret the record as a session header.
    #[must_use]
    pub fn session_meta(&self) -> Option<SessionMeta> {
        if !self.is_session_meta() {
            return None;
        }
        let payload: SessionMetaPayload = self
            .payload
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        let timestamp = payload
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.parsed_timestamp());

        Some(SessionMeta {
            id: payload.id,
            timestamp,
            cwd: payload.cwd,
            originator: payload.originator,
        })
    }
}

/// Payload of a `response_item` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    /// Payload type (`message`, `function_call`, `reasoning`, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Author role.
    #[serde(default)]
    pub role: Option<String>,

    /// Message content: a string or an array of parts.
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SessionMetaPayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    originator: Option<String>,
}

/// A message record extracted from either record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    /// Raw role string.
    pub role: String,
    /// Raw content value.
    pub content: Value,
}

impl MessageRecord {
    /// Renderable text of the message, or an empty string.
    #[must_use]
    pub fn text(&self) -> String {
        extract_text(&self.content)
    }
}

/// Session header metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMeta {
    /// Session identifier.
    pub id: Option<String>,
    /// Session start time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Working directory the session ran in.
    pub cwd: Option<String>,
    /// Client that wrote the session.
    pub originator: Option<String>,
}

/// Extract the textual parts of a message content value.
///
/// Strings are taken as-is; arrays contribute their string elements and the
/// `text` of `input_text`/`output_text`/`text` parts. Parts are joined with
/// newlines and the result trimmed. Interior line breaks are preserved.
#[must_use]
pub fn extract_text(content: &Value) -> String {
    let mut parts: Vec<&str> = Vec::new();

    match content {
        Value::String(s) => parts.push(s),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => parts.push(s),
                    Value::Object(obj) => {
                        let is_text = obj
                            .get("type")
                            .and_then(Value::as_str)
                            .is_some_and(|t| TEXT_PART_TYPES.contains(&t));
                        if is_text {
                            if let Some(text) = obj.get("text").and_then(Value::as_str) {
                                parts.push(text);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse an RFC 3339 timestamp, accepting a trailing `Z`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(json: &str) -> RolloutLine {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_response_item_message() {
        let record = line(
            r#"{"timestamp":"2025-01-01T00:00:01Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hello"}]}}"#,
        );
        let message = record.message().unwrap();
        assert_eq!(message.role, "user");
        assert_eq!(message.text(), "hello");
        assert!(record.parsed_timestamp().is_some());
    }

    #[test]
    fn test_function_call_is_not_a_message() {
        let record = line(
            r#"{"type":"response_item","payload":{"type":"function_call","name":"shell","arguments":"{}"}}"#,
        );
        assert!(record.message().is_none());
    }

    #[test]
    fn test_event_msg_is_not_a_message() {
        let record = line(r#"{"type":"event_msg","payload":{"type":"token_count"}}"#);
        assert!(record.message().is_none());
    }

    #[test]
    fn test_flat_message() {
        let record = line(r#"{"role":"assistant","content":"plain"}"#);
        let message = record.message().unwrap();
        assert_eq!(message.role, "assistant");
        assert_eq!(message.text(), "plain");
    }

    #[test]
    fn test_extract_text_mixed_parts() {
        let content = json!([
            {"type": "output_text", "text": "first"},
            {"type": "image", "url": "x"},
            "second",
            {"type": "text", "text": ""},
            42
        ]);
        assert_eq!(extract_text(&content), "first\nsecond");
    }

    #[test]
    fn test_extract_text_preserves_inner_newlines() {
        let content = json!("  line one\nline two\n\n");
        assert_eq!(extract_text(&content), "line one\nline two");
    }

    #[test]
    fn test_session_meta_prefers_payload_timestamp() {
        let record = line(
            r#"{"timestamp":"2025-01-01T00:00:09Z","type":"session_meta","payload":{"id":"abc","timestamp":"2025-01-01T00:00:00Z","cwd":"/tmp/project"}}"#,
        );
        let meta = record.session_meta().unwrap();
        assert_eq!(meta.id.as_deref(), Some("abc"));
        assert_eq!(meta.cwd.as_deref(), Some("/tmp/project"));
        assert_eq!(
            meta.timestamp,
            parse_timestamp("2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_session_meta_falls_back_to_record_timestamp() {
        let record = line(
            r#"{"timestamp":"2025-01-01T00:00:09Z","type":"session_meta","payload":{"cwd":"/tmp"}}"#,
        );
        let meta = record.session_meta().unwrap();
        assert_eq!(meta.timestamp, parse_timestamp("2025-01-01T00:00:09Z"));
    }

    #[test]
    fn test_parse_timestamp_offsets() {
        assert!(parse_timestamp("2025-06-01T12:00:00+02:00").is_some());
        assert!(parse_timestamp("not a time").is_none());
    }
}
