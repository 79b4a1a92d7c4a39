//! Interactive terminal prompts.
//!
//! Prompt logic is kept in pure state machines; this module only owns the
//! terminal (raw mode, alternate screen) and feeds key presses in.

mod auth_input;
pub mod auth_selector;

use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use auth_input::selector_event;
pub use auth_selector::{AuthMethod, AuthSelector, SelectorEvent, SelectorOutcome};

use crate::ui;

/// Run the auth method prompt until the user confirms or cancels.
///
/// Blocks on terminal input; call from a blocking context.
pub fn run_auth_selector(selector: AuthSelector) -> anyhow::Result<SelectorOutcome> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = auth_selector_loop(&mut terminal, selector);

    // Restore terminal even when the loop failed.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn auth_selector_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut selector: AuthSelector,
) -> anyhow::Result<SelectorOutcome> {
    loop {
        terminal.draw(|frame| ui::draw_auth_selector(frame, &selector))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Filter out Release events (Windows emits Press + Release per keystroke)
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            continue;
        }
        if let Some(ev) = selector_event(key)
            && let Some(outcome) = selector.handle(ev)
        {
            tracing::debug!(?outcome, "auth selector finished");
            return Ok(outcome);
        }
    }
}
