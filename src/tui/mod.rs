//! Terminal User Interface for cohistory.
//!
//! Three levels, one screen at a time:
//! - Dates holding sessions, most recent first
//! - Sessions of the chosen date
//! - The conversation of the chosen session
//!
//! Built with ratatui on a crossterm backend.

pub mod app;
pub mod events;
pub mod pagination;
pub mod render;
pub mod state;
pub mod theme;

pub use app::{run, Exit, ViewerOptions};
pub use events::{Action, KeyBindings, KeySource, ScriptedKeys, TerminalKeys};
pub use pagination::PageWindow;
pub use render::{RenderOptions, Screen};
pub use state::{Flow, NavigationState, Navigator, PageSizes, Viewport};
pub use theme::{available_themes, Theme};
