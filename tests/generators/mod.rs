//! Synthetic Codex session log generators.
//!
//! Lines are built with `serde_json` so arbitrary text is escaped
//! correctly.

#![allow(dead_code)]

use serde_json::json;
use std::path::{Path, PathBuf};

/// A `response_item` message line.
pub fn message_line(role: &str, text: &str) -> String {
    let part_type = if role == "assistant" {
        "output_text"
    } else {
        "input_text"
    };
    json!({
        "timestamp": "2024-05-01T12:00:00.000Z",
        "type": "response_item",
        "payload": {
            "type": "message",
            "role": role,
            "content": [{ "type": part_type, "text": text }],
        },
    })
    .to_string()
}

/// A `session_meta` header line.
pub fn session_meta_line(timestamp: &str, cwd: &str) -> String {
    json!({
        "timestamp": timestamp,
        "type": "session_meta",
        "payload": { "id": "0190a1b2", "timestamp": timestamp, "cwd": cwd, "originator": "codex_cli_rs" },
    })
    .to_string()
}

/// A valid record that never renders as a turn.
pub fn tool_call_line(name: &str) -> String {
    json!({
        "type": "response_item",
        "payload": { "type": "function_call", "name": name, "arguments": "{\"cmd\":[\"ls\"]}" },
    })
    .to_string()
}

/// A full session: header followed by `exchanges` user/assistant pairs with
/// a tool call between them.
pub fn rollout(exchanges: usize) -> Vec<String> {
    let mut lines = vec![session_meta_line("2024-05-01T12:00:00Z", "/work/project")];
    for i in 0..exchanges {
        lines.push(message_line("user", &format!("Question {i}")));
        lines.push(tool_call_line("shell"));
        lines.push(message_line("assistant", &format!("Answer {i}\nwith detail")));
    }
    lines
}

/// Write `lines` as a JSONL file at `root/rel`, creating directories.
pub fn write_session(root: &Path, rel: &str, lines: &[String]) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
