//! cohistory: terminal browser for Codex conversation history.
//!
//! Codex writes one JSONL log per session under
//! `<sessions>/<year>/<month>/<day>/`. This crate finds those logs, parses
//! the user and assistant turns out of them, and lets you page through
//! dates, sessions and conversations with the keyboard.
//!
//! # Architecture
//!
//! - [`discovery`]: Sessions root lookup, date and session listings
//! - [`parser`]: Lenient JSONL parsing into conversation turns
//! - [`model`]: Record shapes and parsed turns
//! - [`tui`]: Paging, navigation state, rendering and the event loop
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//!
//! # Example
//!
//! ```rust,no_run
//! use cohistory::discovery::SessionStore;
//!
//! fn main() -> cohistory::Result<()> {
//!     let store = SessionStore::discover()?;
//!
//!     for date in store.list_dates()? {
//!         println!("{}", date.label());
//!         for session in store.list_sessions(&date)? {
//!             println!("  {} ({} turns)", session.label(), session.parse()?.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;
pub mod tui;

// Re-export commonly used types at the crate root
pub use error::{CohistoryError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Default Codex data directory name.
pub const CODEX_DIR_NAME: &str = ".codex";

/// Sessions subdirectory name.
pub const SESSIONS_DIR_NAME: &str = "sessions";

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::discovery::{DateEntry, SessionEntry, SessionStore};
    pub use crate::error::{CohistoryError, Result};
    pub use crate::model::{Role, Turn};
    pub use crate::parser::SessionParser;
}
