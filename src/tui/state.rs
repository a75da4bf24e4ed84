//! Navigation state machine.
//!
//! The viewer has three levels: dates, the sessions of one date, and the
//! conversation of one session. Every descent pushes the current
//! [`PageWindow`] onto a position stack and every ascent pops it, so coming
//! back up restores the exact selection and scroll position.
//!
//! A selected row taller than the screen is read line by line: the renderer
//! reports how much of it is hidden through [`Viewport`], and up/down scroll
//! inside the row before the selection moves on.

use tracing::{debug, warn};

use crate::discovery::{DateEntry, SessionEntry, SessionStore};
use crate::error::Result;
use crate::model::Turn;
use crate::parser::SessionParser;

use super::events::Action;
use super::pagination::PageWindow;

/// Label of the synthetic first row of the session list.
pub const BACK_TO_DATES: &str = "< Back to Dates";

/// Label of the synthetic first row of the conversation view.
pub const BACK_TO_SESSIONS: &str = "< Back to Sessions";

/// Rows per page at each level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    /// Date list.
    pub dates: usize,
    /// Session list (including the back row).
    pub sessions: usize,
    /// Conversation view (including the back row).
    pub conversation: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            dates: 15,
            sessions: 10,
            conversation: 10,
        }
    }
}

/// The active browsing level and the data it shows.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    /// Choosing a date.
    AtDates,
    /// Choosing a session of `date`.
    AtSessions {
        /// The chosen date.
        date: DateEntry,
        /// Its sessions, most recent first.
        sessions: Vec<SessionEntry>,
    },
    /// Reading a conversation.
    AtConversation {
        /// The chosen date.
        date: DateEntry,
        /// Sessions of the date, kept for the way back.
        sessions: Vec<SessionEntry>,
        /// The open session.
        session: SessionEntry,
        /// Its parsed turns.
        turns: Vec<Turn>,
        /// Lines skipped because they were not valid JSON.
        malformed_lines: usize,
    },
}

/// Body geometry reported by the last drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Screen rows available to the list.
    pub height: usize,
    /// Lines of the selected row scrolled above the top of the body.
    pub line_offset: usize,
    /// Lines of the selected row still below the bottom of the body.
    pub hidden_below: usize,
}

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Redraw and wait for the next key.
    Continue,
    /// Leave normally.
    Quit,
    /// Leave immediately.
    Interrupt,
}

/// Owner of all navigation state.
#[derive(Debug)]
pub struct Navigator {
    store: SessionStore,
    page_sizes: PageSizes,
    dates: Vec<DateEntry>,
    state: NavigationState,
    window: PageWindow,
    positions: Vec<PageWindow>,
    viewport: Viewport,
    error: Option<String>,
}

impl Navigator {
    /// Load the date list and start at the top of it.
    pub fn new(store: SessionStore, page_sizes: PageSizes) -> Result<Self> {
        let dates = store.list_dates()?;
        let window = PageWindow::new(dates.len(), page_sizes.dates, 0);

        Ok(Self {
            store,
            page_sizes,
            dates,
            state: NavigationState::AtDates,
            window,
            positions: Vec::new(),
            viewport: Viewport::default(),
            error: None,
        })
    }

    /// The sessions store being browsed.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// All dates, most recent first.
    #[must_use]
    pub fn dates(&self) -> &[DateEntry] {
        &self.dates
    }

    /// The active level.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Cursor of the active level.
    #[must_use]
    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Saved cursors of the levels above, outermost first.
    #[must_use]
    pub fn positions(&self) -> &[PageWindow] {
        &self.positions
    }

    /// Lines of the selected row scrolled out of view at the top.
    #[must_use]
    pub fn line_offset(&self) -> usize {
        self.viewport.line_offset
    }

    /// Record the geometry of the frame just drawn.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Transient error shown until the next key press.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply one action.
    pub fn handle(&mut self, action: Action) -> Flow {
        self.error = None;

        match action {
            Action::Quit => return Flow::Quit,
            Action::Interrupt => return Flow::Interrupt,
            Action::Up if self.viewport.line_offset > 0 => self.scroll_up(1),
            Action::Down if self.viewport.hidden_below > 0 => self.scroll_down(1),
            Action::PageUp if self.viewport.line_offset > 0 => {
                self.scroll_up(self.viewport.height.max(1));
            }
            Action::PageDown if self.viewport.hidden_below > 0 => {
                self.scroll_down(self.viewport.height.max(1));
            }
            Action::Up => self.move_cursor(PageWindow::step_up),
            Action::Down => self.move_cursor(PageWindow::step_down),
            Action::PageUp => self.move_cursor(PageWindow::page_up),
            Action::PageDown => self.move_cursor(PageWindow::page_down),
            Action::Home => self.move_cursor(PageWindow::home),
            Action::End => self.move_cursor(PageWindow::end),
            Action::Select => self.select(),
            Action::Back => self.back(),
        }

        Flow::Continue
    }

    fn scroll_down(&mut self, lines: usize) {
        let lines = lines.min(self.viewport.hidden_below);
        self.viewport.line_offset += lines;
        self.viewport.hidden_below -= lines;
    }

    fn scroll_up(&mut self, lines: usize) {
        let lines = lines.min(self.viewport.line_offset);
        self.viewport.line_offset -= lines;
        self.viewport.hidden_below += lines;
    }

    /// Move the selection; a new row starts at its first line.
    fn move_cursor(&mut self, movement: fn(&mut PageWindow)) {
        let before = self.window.selected_index();
        movement(&mut self.window);
        if self.window.selected_index() != before {
            self.reset_scroll();
        }
    }

    fn reset_scroll(&mut self) {
        self.viewport.line_offset = 0;
        self.viewport.hidden_below = 0;
    }

    /// Activate the selected row.
    fn select(&mut self) {
        if self.window.is_empty() {
            return;
        }
        let selected = self.window.selected_index();

        match &self.state {
            NavigationState::AtDates => {
                let date = self.dates[selected].clone();
                self.enter_date(date);
            }
            NavigationState::AtSessions { .. } if selected == 0 => self.back(),
            NavigationState::AtSessions { sessions, .. } => {
                let session = sessions[selected - 1].clone();
                self.open_session(session);
            }
            NavigationState::AtConversation { .. } if selected == 0 => self.back(),
            NavigationState::AtConversation { .. } => {}
        }
    }

    fn enter_date(&mut self, date: DateEntry) {
        match self.store.list_sessions(&date) {
            Ok(sessions) => {
                debug!(date = %date.iso(), sessions = sessions.len(), "Entering date");
                let count = sessions.len() + 1;
                self.descend(
                    NavigationState::AtSessions { date, sessions },
                    count,
                    self.page_sizes.sessions,
                );
            }
            Err(e) => {
                warn!(date = %date.iso(), error = %e, "Cannot list sessions");
                self.error = Some(format!("Cannot list sessions for {}: {e}", date.iso()));
            }
        }
    }

    fn open_session(&mut self, session: SessionEntry) {
        let NavigationState::AtSessions { date, sessions } = &self.state else {
            return;
        };

        let mut parser = SessionParser::new();
        match parser.parse_file(session.path()) {
            Ok(turns) => {
                debug!(session = %session.file_name(), turns = turns.len(), "Opening session");
                let count = turns.len() + 1;
                let next = NavigationState::AtConversation {
                    date: date.clone(),
                    sessions: sessions.clone(),
                    session,
                    turns,
                    malformed_lines: parser.stats().lines_malformed,
                };
                self.descend(next, count, self.page_sizes.conversation);
            }
            Err(e) => {
                warn!(session = %session.path().display(), error = %e, "Cannot open session");
                self.error = Some(e.to_string());
            }
        }
    }

    fn descend(&mut self, next: NavigationState, count: usize, page_size: usize) {
        self.positions.push(self.window);
        self.window = PageWindow::new(count, page_size, 0);
        self.state = next;
        self.reset_scroll();
    }

    /// Go up one level, restoring its saved cursor.
    fn back(&mut self) {
        let state = std::mem::replace(&mut self.state, NavigationState::AtDates);
        let (parent, count, page_size) = match state {
            NavigationState::AtDates => {
                self.state = NavigationState::AtDates;
                return;
            }
            NavigationState::AtSessions { .. } => (
                NavigationState::AtDates,
                self.dates.len(),
                self.page_sizes.dates,
            ),
            NavigationState::AtConversation { date, sessions, .. } => {
                let count = sessions.len() + 1;
                (
                    NavigationState::AtSessions { date, sessions },
                    count,
                    self.page_sizes.sessions,
                )
            }
        };

        self.window = self
            .positions
            .pop()
            .unwrap_or_else(|| PageWindow::new(count, page_size, 0));
        self.state = parent;
        self.reset_scroll();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const USER: &str = r#"{"type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hi"}]}}"#;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn navigator(root: &Path) -> Navigator {
        Navigator::new(SessionStore::open(root).unwrap(), PageSizes::default()).unwrap()
    }

    #[test]
    fn test_starts_at_dates() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", USER);
        let nav = navigator(dir.path());

        assert_eq!(nav.state(), &NavigationState::AtDates);
        assert_eq!(nav.window().count(), 1);
        assert!(nav.positions().is_empty());
    }

    #[test]
    fn test_enter_and_back_restores_position() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=20 {
            touch(dir.path(), &format!("2024/05/{day:02}/09-00-00.jsonl"), USER);
        }
        let mut nav = navigator(dir.path());

        nav.handle(Action::PageDown);
        nav.handle(Action::Down);
        let before = *nav.window();
        assert_eq!(before.selected_index(), 16);

        nav.handle(Action::Select);
        assert!(matches!(nav.state(), NavigationState::AtSessions { .. }));
        assert_eq!(nav.window().selected_index(), 0);

        nav.handle(Action::Select); // "< Back to Dates"
        assert_eq!(nav.state(), &NavigationState::AtDates);
        assert_eq!(*nav.window(), before);
    }

    #[test]
    fn test_conversation_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for minute in 0..12 {
            touch(dir.path(), &format!("2024/05/01/09-{minute:02}-00.jsonl"), USER);
        }
        let mut nav = navigator(dir.path());
        nav.handle(Action::Select);

        nav.handle(Action::End);
        nav.handle(Action::Up);
        let sessions_cursor = *nav.window();

        nav.handle(Action::Select);
        match nav.state() {
            NavigationState::AtConversation { turns, .. } => assert_eq!(turns.len(), 1),
            other => panic!("expected conversation, got {other:?}"),
        }
        nav.handle(Action::Down);

        nav.handle(Action::Back);
        assert!(matches!(nav.state(), NavigationState::AtSessions { .. }));
        assert_eq!(*nav.window(), sessions_cursor);
    }

    #[test]
    fn test_unreadable_session_stays_put() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", USER);
        let mut nav = navigator(dir.path());
        nav.handle(Action::Select);
        nav.handle(Action::Down);

        std::fs::remove_file(dir.path().join("2024/05/01/09-00-00.jsonl")).unwrap();
        nav.handle(Action::Select);

        assert!(matches!(nav.state(), NavigationState::AtSessions { .. }));
        assert!(nav.error().is_some());
        assert_eq!(nav.window().selected_index(), 1);

        nav.handle(Action::Up);
        assert!(nav.error().is_none());
    }

    #[test]
    fn test_vanished_date_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", USER);
        let mut nav = navigator(dir.path());
        std::fs::remove_dir_all(dir.path().join("2024")).unwrap();

        nav.handle(Action::Select);
        assert_eq!(nav.state(), &NavigationState::AtDates);
        assert!(nav.error().unwrap().contains("2024-05-01"));
    }

    #[test]
    fn test_back_at_dates_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", USER);
        let mut nav = navigator(dir.path());

        assert_eq!(nav.handle(Action::Back), Flow::Continue);
        assert_eq!(nav.state(), &NavigationState::AtDates);
    }

    #[test]
    fn test_quit_and_interrupt() {
        let dir = tempfile::tempdir().unwrap();
        let mut nav = navigator(dir.path());
        assert_eq!(nav.handle(Action::Quit), Flow::Quit);
        assert_eq!(nav.handle(Action::Interrupt), Flow::Interrupt);
    }

    #[test]
    fn test_select_on_empty_dates() {
        let dir = tempfile::tempdir().unwrap();
        let mut nav = navigator(dir.path());
        nav.handle(Action::Select);
        assert_eq!(nav.state(), &NavigationState::AtDates);
    }

    #[test]
    fn test_tall_row_scrolls_before_moving() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", &format!("{USER}\n{USER}\n"));
        let mut nav = navigator(dir.path());
        nav.handle(Action::Select);
        nav.handle(Action::Down);
        nav.handle(Action::Select);
        nav.handle(Action::Down);
        nav.set_viewport(Viewport {
            height: 4,
            line_offset: 0,
            hidden_below: 6,
        });

        nav.handle(Action::Down);
        assert_eq!(nav.window().selected_index(), 1);
        assert_eq!(nav.line_offset(), 1);

        nav.handle(Action::PageDown);
        nav.handle(Action::PageDown);
        assert_eq!(nav.line_offset(), 6);
        assert_eq!(nav.window().selected_index(), 1);

        nav.handle(Action::PageUp);
        assert_eq!(nav.line_offset(), 2);
        nav.handle(Action::PageDown);

        // Fully scrolled: the next Down moves to the next turn from its top.
        nav.handle(Action::Down);
        assert_eq!(nav.window().selected_index(), 2);
        assert_eq!(nav.line_offset(), 0);
    }

    #[test]
    fn test_leaving_level_resets_line_scroll() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2024/05/01/09-00-00.jsonl", USER);
        let mut nav = navigator(dir.path());
        nav.handle(Action::Select);
        nav.handle(Action::Down);
        nav.handle(Action::Select);
        nav.handle(Action::Down);
        nav.set_viewport(Viewport {
            height: 4,
            line_offset: 3,
            hidden_below: 0,
        });

        nav.handle(Action::Back);
        assert_eq!(nav.line_offset(), 0);
        // The session list moves normally.
        nav.handle(Action::Up);
        assert_eq!(nav.window().selected_index(), 0);
    }
}
