//! Keyboard input for the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action resulting from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Rebuild every widget now.
    Refresh,
    /// No action.
    None,
}

/// Maps a key event to an action.
#[must_use]
pub fn handle_key(event: KeyEvent) -> Action {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') | KeyCode::F(5) => Action::Refresh,
        _ => Action::None,
    }
}
