//! Terminal events and key bindings for the postbot TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Nothing happened for one tick; used for redraws and the spinner.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Reads terminal events on a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm reads are blocking, so they get their own thread.
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };

                if let Some(e) = event {
                    if tx_clone.send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    /// Open or close the chat window directly.
    ToggleWindow,
    /// Start a new conversation.
    Reset,
    /// Esc: close request, dismiss, or back.
    Back,
    Select,
    Up,
    Down,
    Left,
    Right,
    NextFocus,
    PrevFocus,
    ScrollUp,
    ScrollDown,
    /// Digit key, used for star ratings.
    Stars(u8),
    /// End the session from the feedback modal.
    EndSession,
    None,
}

/// Convert a key event to an action.
///
/// Text entry is handled before this when the input line has focus, so
/// plain letters only reach here on screens without an input.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('o') => Action::ToggleWindow,
            KeyCode::Char('r') => Action::Reset,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => Action::Help,
        KeyCode::Char('o') => Action::ToggleWindow,
        KeyCode::Char('x') => Action::EndSession,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Tab => Action::NextFocus,
        KeyCode::BackTab => Action::PrevFocus,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        #[allow(clippy::cast_possible_truncation)]
        KeyCode::Char(c @ '0'..='9') => Action::Stars(c.to_digit(10).unwrap_or(0) as u8),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_control_bindings() {
        assert_eq!(key_to_action(ctrl('c')), Action::Quit);
        assert_eq!(key_to_action(ctrl('o')), Action::ToggleWindow);
        assert_eq!(key_to_action(ctrl('r')), Action::Reset);
        assert_eq!(key_to_action(ctrl('z')), Action::None);
    }

    #[test]
    fn test_digits_map_to_stars() {
        assert_eq!(key_to_action(key(KeyCode::Char('0'))), Action::Stars(0));
        assert_eq!(key_to_action(key(KeyCode::Char('4'))), Action::Stars(4));
        assert_eq!(key_to_action(key(KeyCode::Char('9'))), Action::Stars(9));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Back);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Select);
        assert_eq!(key_to_action(key(KeyCode::Tab)), Action::NextFocus);
        assert_eq!(key_to_action(key(KeyCode::BackTab)), Action::PrevFocus);
        assert_eq!(key_to_action(key(KeyCode::Char('k'))), Action::Up);
        assert_eq!(key_to_action(key(KeyCode::PageDown)), Action::ScrollDown);
    }
}
