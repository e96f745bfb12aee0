//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App<'_>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => app.next(),
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => app.prev(),
        KeyCode::Home => app.first(),
        KeyCode::End => app.last(),
        _ => {}
    }
}
