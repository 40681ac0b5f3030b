use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use replay_core::ReplaySession;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// The viewer state: one replay session plus presentation bits.
pub struct App {
    pub session: ReplaySession,
    pub theme: Theme,
    /// Digit buffer while the user is typing a step number to jump to
    pub jump_entry: Option<String>,
    /// Transient status message
    pub message: Option<String>,
}

impl App {
    pub fn new(session: ReplaySession, theme: Theme) -> Self {
        Self {
            session,
            theme,
            jump_entry: None,
            message: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        self.message = None;

        if self.jump_entry.is_some() {
            self.handle_jump_entry_key(key);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                if !self.session.step_forward() {
                    self.message = Some("Already at the end of the trace".into());
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if !self.session.step_backward() {
                    self.message = Some("Already at the initial state".into());
                }
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.session.jump_to(-1);
            }
            KeyCode::End | KeyCode::Char('G') => {
                let last = self.session.trace_len() as isize - 1;
                self.session.jump_to(last);
            }
            KeyCode::PageDown => {
                let last = self.session.trace_len() as isize - 1;
                let target = (self.session.cursor() + 10).min(last);
                self.session.jump_to(target);
            }
            KeyCode::PageUp => {
                let target = (self.session.cursor() - 10).max(-1);
                self.session.jump_to(target);
            }
            KeyCode::Char(':') | KeyCode::Char('j') => {
                self.jump_entry = Some(String::new());
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_jump_entry_key(&mut self, key: KeyEvent) {
        let entry = self.jump_entry.as_mut().expect("jump entry active");
        match key.code {
            KeyCode::Char(c @ '0'..='9') => entry.push(c),
            KeyCode::Backspace => {
                entry.pop();
            }
            KeyCode::Esc => self.jump_entry = None,
            KeyCode::Enter => {
                let entry = self.jump_entry.take().unwrap_or_default();
                self.commit_jump(&entry);
            }
            _ => {}
        }
    }

    /// Jump to a 1-based step number; `0` means the initial state.
    fn commit_jump(&mut self, entry: &str) {
        let Ok(step) = entry.parse::<isize>() else {
            return;
        };
        if !self.session.jump_to(step - 1) {
            self.message = Some(format!(
                "Step {} out of range (0-{})",
                step,
                self.session.trace_len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use replay_core::{Board, Event, Position, Trace};

    fn app() -> App {
        let board = Board::empty();
        let events = vec![
            Event::ArcInferred {
                cell: Position::new(0, 0),
                value: 3,
            },
            Event::BacktrackAssign {
                cell: Position::new(1, 1),
                value: 7,
            },
        ];
        let trace = Trace::from_events(&board, events).unwrap();
        App::new(ReplaySession::new(board, trace), Theme::dark())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_step_keys_move_cursor() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.session.cursor(), 0);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.session.cursor(), -1);
        // Stepping back at the start reports instead of moving.
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.session.cursor(), -1);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_home_end() {
        let mut app = app();
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.session.cursor(), 1);
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.session.cursor(), -1);
    }

    #[test]
    fn test_numeric_jump() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(':')));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.cursor(), 1);
        assert!(app.jump_entry.is_none());

        // Out-of-range entry leaves the cursor alone and reports.
        app.handle_key(key(KeyCode::Char(':')));
        app.handle_key(key(KeyCode::Char('9')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.cursor(), 1);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(matches!(app.handle_key(key(KeyCode::Char('q'))), AppAction::Quit));
    }
}
