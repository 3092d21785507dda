//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use plugdrop_core::session::SessionEvent;

pub const HELP: &str = "Use ↑/↓ or j/k to navigate, Enter/Space to deploy, 't' to toggle, 'r' to refresh, 'q' to quit";

/// Map a key press to a session event. Releases and repeats are ignored.
pub fn map_key(key: KeyEvent) -> Option<SessionEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Quit)
        }
        KeyCode::Char('q') => Some(SessionEvent::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(SessionEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(SessionEvent::MoveDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(SessionEvent::Deploy),
        KeyCode::Char('t') => Some(SessionEvent::Toggle),
        KeyCode::Char('r') => Some(SessionEvent::Refresh),
        _ => None,
    }
}
