//! Key mapping for the auth method prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::auth_selector::SelectorEvent;

/// Translate a key press into a selector event. Unmapped keys yield `None`.
pub fn selector_event(key: KeyEvent) -> Option<SelectorEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(SelectorEvent::Cancel);
    }
    match key.code {
        KeyCode::Up => Some(SelectorEvent::Up),
        KeyCode::Down => Some(SelectorEvent::Down),
        KeyCode::Enter => Some(SelectorEvent::Confirm),
        KeyCode::Esc => Some(SelectorEvent::Cancel),
        KeyCode::Char(c) => Some(SelectorEvent::Shortcut(c)),
        _ => None,
    }
}
