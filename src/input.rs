//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Reset,
    Quit,
    None,
}

/// Map key event to game action: Enter starts, `r` resets, `q`/Esc quits.
/// Everything else is a no-op.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if !modifiers.is_empty() && modifiers != KeyModifiers::SHIFT {
        return Action::None;
    }
    match code {
        KeyCode::Enter => Action::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Reset,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_recognized_keys() {
        assert_eq!(key_to_action(press(KeyCode::Enter)), Action::Start);
        assert_eq!(key_to_action(press(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(key_to_action(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(press(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_shifted_letters_still_count() {
        let key = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(key), Action::Reset);
    }

    #[test]
    fn test_everything_else_is_noop() {
        assert_eq!(key_to_action(press(KeyCode::Char('x'))), Action::None);
        assert_eq!(key_to_action(press(KeyCode::Left)), Action::None);
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_r), Action::None);
    }
}
