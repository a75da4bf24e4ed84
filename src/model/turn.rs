//! Conversation turns.

use std::fmt;

use chrono::{DateTime, Utc};

/// Author of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Human input.
    User,
    /// Model output.
    Assistant,
    /// System or developer instructions.
    System,
    /// Any other role, kept under its raw name.
    Other(String),
}

impl Role {
    /// Map a raw role string onto a role.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" | "developer" => Self::System,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Label shown in front of a turn.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other(name) if name.is_empty() => "other",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed message within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Position in the session, strictly increasing in file order.
    pub ordinal: usize,
    /// Author role.
    pub role: Role,
    /// Message body, line breaks preserved.
    pub text: String,
    /// Record timestamp, when the line carried one.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Turn {
    /// Create a new turn.
    #[must_use]
    pub fn new(ordinal: usize, role: Role, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            role,
            text: text.into(),
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Body split into display lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}
