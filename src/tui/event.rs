use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{ActivePanel, AppState, EditField};

/// Actions the key handler asks the app to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Connect,
    Disconnect,
    SendLine(String),
    SaveTranscript(String),
    ClearTranscript,
    FlushPending,
    RefreshPorts,
}

pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        if state.editing.is_some() {
            return self.handle_edit_mode(key, state);
        }

        if state.show_help {
            if matches!(key.code, KeyCode::Char('h') | KeyCode::Esc) {
                state.toggle_help();
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Char('h') => {
                state.toggle_help();
                None
            }
            KeyCode::Tab => {
                state.active_panel = state.active_panel.next();
                None
            }
            KeyCode::Enter => Some(AppEvent::Connect),
            KeyCode::Char('x') => Some(AppEvent::Disconnect),
            KeyCode::Char('c') => Some(AppEvent::ClearTranscript),
            KeyCode::Char('f') => Some(AppEvent::FlushPending),
            KeyCode::Char('r') => Some(AppEvent::RefreshPorts),
            KeyCode::Char('i') => {
                state.begin_edit(EditField::SendLine);
                None
            }
            KeyCode::Char('s') => {
                state.begin_edit(EditField::SavePath);
                None
            }
            KeyCode::Char('a') => {
                state.begin_edit(EditField::Address);
                None
            }
            KeyCode::Char('p') => {
                if state.cycle_port_choice() {
                    state.begin_edit(EditField::CustomPort);
                }
                None
            }
            KeyCode::Char('b') => {
                if state.cycle_speed_choice() {
                    state.begin_edit(EditField::CustomBaud);
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                match state.active_panel {
                    ActivePanel::Transcript => state.scroll_up(),
                    _ => state.select_previous_port(),
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                match state.active_panel {
                    ActivePanel::Transcript => state.scroll_down(),
                    _ => state.select_next_port(),
                }
                None
            }
            KeyCode::Esc => {
                state.clear_status_message();
                None
            }
            _ => None,
        }
    }

    fn handle_edit_mode(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        match key.code {
            KeyCode::Enter => match state.finish_edit()? {
                (EditField::SendLine, text) => Some(AppEvent::SendLine(text)),
                (EditField::SavePath, path) if !path.trim().is_empty() => {
                    Some(AppEvent::SaveTranscript(path.trim().to_string()))
                }
                _ => None,
            },
            KeyCode::Esc => {
                state.cancel_edit();
                None
            }
            _ => {
                state.input.handle_key(key);
                None
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selector::PortChoice;

    fn press(handler: &EventHandler, state: &mut AppState, code: KeyCode) -> Option<AppEvent> {
        handler.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    fn type_text(handler: &EventHandler, state: &mut AppState, text: &str) {
        for c in text.chars() {
            press(handler, state, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_send_line_flow() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        assert_eq!(press(&handler, &mut state, KeyCode::Char('i')), None);
        // Command keys are plain text while editing.
        type_text(&handler, &mut state, "quit");
        assert_eq!(
            press(&handler, &mut state, KeyCode::Enter),
            Some(AppEvent::SendLine("quit".to_string()))
        );
        assert!(state.editing.is_none());
    }

    #[test]
    fn test_empty_line_is_still_sent() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        press(&handler, &mut state, KeyCode::Char('i'));
        assert_eq!(
            press(&handler, &mut state, KeyCode::Enter),
            Some(AppEvent::SendLine(String::new()))
        );
    }

    #[test]
    fn test_save_requires_a_path() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        press(&handler, &mut state, KeyCode::Char('s'));
        assert_eq!(press(&handler, &mut state, KeyCode::Enter), None);

        press(&handler, &mut state, KeyCode::Char('s'));
        type_text(&handler, &mut state, "capture");
        assert_eq!(
            press(&handler, &mut state, KeyCode::Enter),
            Some(AppEvent::SaveTranscript("capture".to_string()))
        );
    }

    #[test]
    fn test_custom_port_prompt() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        press(&handler, &mut state, KeyCode::Char('p'));
        assert_eq!(state.port_choice, PortChoice::Alternate);
        assert!(state.editing.is_none());

        press(&handler, &mut state, KeyCode::Char('p'));
        assert_eq!(state.editing, Some(EditField::CustomPort));
        type_text(&handler, &mut state, "4000");
        press(&handler, &mut state, KeyCode::Enter);
        assert_eq!(state.port_choice, PortChoice::Custom("4000".to_string()));
    }

    #[test]
    fn test_help_swallows_keys() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        press(&handler, &mut state, KeyCode::Char('h'));
        assert!(state.show_help);
        assert_eq!(press(&handler, &mut state, KeyCode::Char('q')), None);
        press(&handler, &mut state, KeyCode::Esc);
        assert!(!state.show_help);
        assert_eq!(press(&handler, &mut state, KeyCode::Char('q')), Some(AppEvent::Quit));
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let handler = EventHandler::new();
        let mut state = AppState::new(100);

        press(&handler, &mut state, KeyCode::Char('a'));
        let event = handler.handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut state,
        );
        assert_eq!(event, Some(AppEvent::Quit));
    }
}
