//! Data model for Codex session logs.
//!
//! Two layers live here:
//! - [`event`]: the on-disk JSONL record shapes, deserialized with serde
//! - [`turn`]: the immutable conversation turns the viewer renders

pub mod event;
pub mod turn;

pub use event::*;
pub use turn::*;
