//! Error types for cohistory.
//!
//! Errors stay local to the smallest unit that failed: a malformed line is
//! recorded and skipped, an unreadable session is shown inline, and only a
//! missing sessions root at startup ends the program.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for cohistory operations.
#[derive(Error, Debug)]
pub enum CohistoryError {
    /// The sessions root or a date directory does not exist.
    #[error("Directory not found: {path}")]
    NotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// A session file could not be opened or read.
    #[error("Cannot read session {path}: {source}")]
    SessionUnreadable {
        /// Path to the session file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A single JSONL line failed to parse.
    #[error("Malformed JSONL at line {line}: {message}")]
    MalformedLine {
        /// Line number (1-indexed).
        line: usize,
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    Serialization {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {message}")]
    Terminal {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },
}

impl CohistoryError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a not-found error for a path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a terminal error.
    #[must_use]
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MalformedLine { .. } => exit_codes::EXIT_PARSE_ERROR,
            Self::NotFound { .. } => exit_codes::EXIT_NOT_FOUND,
            Self::SessionUnreadable { .. } | Self::Io { .. } => exit_codes::EXIT_IO_ERROR,
            Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::Terminal { .. } | Self::Serialization { .. } => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Check whether the viewer can keep running after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedLine { .. } | Self::SessionUnreadable { .. }
        )
    }
}

/// Result type alias for cohistory operations.
pub type Result<T> = std::result::Result<T, CohistoryError>;

impl From<std::io::Error> for CohistoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CohistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for the `cohistory` binary.
pub mod exit_codes {
    /// Normal quit or interrupt.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// JSONL parsing failed in strict mode.
    pub const EXIT_PARSE_ERROR: i32 = 2;
    /// Sessions root or date directory not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
