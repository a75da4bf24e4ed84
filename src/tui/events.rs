//! Key input.
//!
//! The viewer reads one key at a time through [`KeySource`] and maps it onto
//! an [`Action`] with [`KeyBindings`]. There are no ticks and no background
//! reader thread: the loop blocks until the next key arrives.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::{CohistoryError, Result};

/// Navigation actions understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the selection up one row, or scroll up inside a tall row.
    Up,
    /// Move the selection down one row, or scroll down inside a tall row.
    Down,
    /// Move the selection up one page, or scroll up a screen inside a tall row.
    PageUp,
    /// Move the selection down one page, or scroll down a screen inside a tall row.
    PageDown,
    /// Jump to the first row.
    Home,
    /// Jump to the last row.
    End,
    /// Activate the selected row.
    Select,
    /// Go up one level.
    Back,
    /// Leave the viewer.
    Quit,
    /// Ctrl+C: leave immediately.
    Interrupt,
}

/// Source of key presses.
pub trait KeySource {
    /// Block until the next key press.
    fn next_key(&mut self) -> Result<KeyEvent>;
}

/// Key source backed by the crossterm event stream.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            let event = event::read()
                .map_err(|e| CohistoryError::io("Failed to read terminal event", e))?;
            // Windows reports both press and release; only presses count.
            if let CrosstermEvent::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }
}

/// Scripted key source, used by tests and replays.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    /// Create a source that yields `keys` in order.
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        // Running out of script reads as an interrupt so loops always end.
        Ok(self
            .keys
            .pop_front()
            .unwrap_or_else(|| KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
    }
}

/// Key binding configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Interrupt keys.
    pub interrupt: Vec<KeyEvent>,
    /// Quit keys.
    pub quit: Vec<KeyEvent>,
    /// Navigation up.
    pub up: Vec<KeyEvent>,
    /// Navigation down.
    pub down: Vec<KeyEvent>,
    /// Page up.
    pub page_up: Vec<KeyEvent>,
    /// Page down.
    pub page_down: Vec<KeyEvent>,
    /// First row.
    pub home: Vec<KeyEvent>,
    /// Last row.
    pub end: Vec<KeyEvent>,
    /// Select/confirm.
    pub select: Vec<KeyEvent>,
    /// Back.
    pub back: Vec<KeyEvent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        Self {
            interrupt: vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)],
            quit: vec![key(KeyCode::Char('q'))],
            up: vec![key(KeyCode::Up), key(KeyCode::Char('k'))],
            down: vec![key(KeyCode::Down), key(KeyCode::Char('j'))],
            page_up: vec![key(KeyCode::PageUp)],
            page_down: vec![key(KeyCode::PageDown)],
            home: vec![key(KeyCode::Home), key(KeyCode::Char('g'))],
            end: vec![key(KeyCode::End), key(KeyCode::Char('G'))],
            select: vec![key(KeyCode::Enter)],
            back: vec![
                key(KeyCode::Esc),
                key(KeyCode::Backspace),
                key(KeyCode::Left),
                key(KeyCode::Char('h')),
            ],
        }
    }
}

impl KeyBindings {
    /// Map a key press onto an action. Unbound keys map to `None`.
    #[must_use]
    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        let table: [(&[KeyEvent], Action); 10] = [
            (self.interrupt.as_slice(), Action::Interrupt),
            (self.quit.as_slice(), Action::Quit),
            (self.up.as_slice(), Action::Up),
            (self.down.as_slice(), Action::Down),
            (self.page_up.as_slice(), Action::PageUp),
            (self.page_down.as_slice(), Action::PageDown),
            (self.home.as_slice(), Action::Home),
            (self.end.as_slice(), Action::End),
            (self.select.as_slice(), Action::Select),
            (self.back.as_slice(), Action::Back),
        ];

        table
            .iter()
            .find(|(keys, _)| keys.iter().any(|k| matches_key(k, key)))
            .map(|(_, action)| *action)
    }
}

fn matches_key(binding: &KeyEvent, key: &KeyEvent) -> bool {
    // Terminals disagree on whether uppercase letters carry SHIFT.
    let modifiers = match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => key.modifiers.difference(KeyModifiers::SHIFT),
        _ => key.modifiers,
    };
    binding.code == key.code && binding.modifiers == modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action(&press(KeyCode::Up)), Some(Action::Up));
        assert_eq!(bindings.action(&press(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(bindings.action(&press(KeyCode::PageDown)), Some(Action::PageDown));
        assert_eq!(bindings.action(&press(KeyCode::Enter)), Some(Action::Select));
        assert_eq!(bindings.action(&press(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(bindings.action(&press(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        let bindings = KeyBindings::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(bindings.action(&ctrl_c), Some(Action::Interrupt));
        assert_eq!(bindings.action(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_shifted_uppercase() {
        let bindings = KeyBindings::default();
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(bindings.action(&shifted), Some(Action::End));
    }

    #[test]
    fn test_unbound_key() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action(&press(KeyCode::Char('z'))), None);
        assert_eq!(bindings.action(&press(KeyCode::F(5))), None);
    }

    #[test]
    fn test_scripted_keys_end_with_interrupt() {
        let mut keys = ScriptedKeys::new([press(KeyCode::Down)]);
        assert_eq!(keys.next_key().unwrap().code, KeyCode::Down);
        assert_eq!(keys.remaining(), 0);
        let tail = keys.next_key().unwrap();
        assert_eq!(tail.modifiers, KeyModifiers::CONTROL);
    }
}
