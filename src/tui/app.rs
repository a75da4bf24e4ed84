//! TUI application main loop.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crate::discovery::SessionStore;
use crate::error::{CohistoryError, Result};

use super::events::{KeyBindings, KeySource, TerminalKeys};
use super::render::{draw, render, RenderOptions};
use super::state::{Flow, Navigator, PageSizes, Viewport};
use super::theme::Theme;

/// Settings for one viewer run.
#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    /// Color theme.
    pub theme: Theme,
    /// Rendering switches.
    pub render: RenderOptions,
    /// Rows per page at each level.
    pub page_sizes: PageSizes,
    /// Key bindings.
    pub bindings: KeyBindings,
}

/// How the viewer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The quit key was pressed.
    Quit,
    /// Ctrl+C was pressed.
    Interrupted,
}

/// Run the interactive viewer on the real terminal.
pub fn run(store: SessionStore, options: &ViewerOptions) -> Result<Exit> {
    let mut navigator = Navigator::new(store, options.page_sizes)?;

    // Setup terminal
    enable_raw_mode().map_err(|e| {
        CohistoryError::terminal(format!(
            "Cannot launch TUI - no interactive terminal available: {e}"
        ))
    })?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(CohistoryError::io("Failed to enter alternate screen", e));
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|e| CohistoryError::io("Failed to create terminal", e))
        .and_then(|mut terminal| {
            let result = run_loop(&mut terminal, &mut navigator, &mut TerminalKeys, options);
            let _ = terminal.show_cursor();
            result
        });

    // Restore terminal, even when the loop failed.
    let restored = restore_terminal(
        disable_raw_mode(),
        execute!(io::stdout(), LeaveAlternateScreen),
    );

    let exit = result?;
    restored?;
    Ok(exit)
}

/// Combine the outcomes of both restore steps, first failure wins.
///
/// Both steps must already have run when this is called.
fn restore_terminal(raw_mode: io::Result<()>, alternate_screen: io::Result<()>) -> Result<()> {
    raw_mode.map_err(|e| CohistoryError::io("Failed to disable raw mode", e))?;
    alternate_screen.map_err(|e| CohistoryError::io("Failed to leave alternate screen", e))
}

/// Draw, read a key, dispatch; until quit or interrupt.
pub fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    navigator: &mut Navigator,
    keys: &mut impl KeySource,
    options: &ViewerOptions,
) -> Result<Exit> {
    loop {
        let screen = render(navigator, &options.theme, &options.render);
        let mut viewport = Viewport::default();
        terminal
            .draw(|f| viewport = draw(f, &screen, &options.theme))
            .map_err(|e| CohistoryError::terminal(format!("Failed to draw TUI: {e}")))?;
        navigator.set_viewport(viewport);

        let key = keys.next_key()?;
        let Some(action) = options.bindings.action(&key) else {
            debug!(?key, "Ignoring unbound key");
            continue;
        };

        match navigator.handle(action) {
            Flow::Continue => {}
            Flow::Quit => {
                info!("Viewer closed");
                return Ok(Exit::Quit);
            }
            Flow::Interrupt => {
                info!("Viewer interrupted");
                return Ok(Exit::Interrupted);
            }
        }
    }
}
