//! Layout helpers for the postbot TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Regions of the chat window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub transcript: Rect,
    pub options: Rect,
    pub input: Rect,
}

/// Split the chat window's main area.
///
/// The options strip grows with the number of button rows and disappears
/// when there are none.
pub fn chat_layout(area: Rect, option_rows: u16) -> ChatLayout {
    let options_height = if option_rows == 0 { 0 } else { option_rows + 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(options_height),
            Constraint::Length(3),
        ])
        .split(area);
    ChatLayout {
        transcript: chunks[0],
        options: chunks[1],
        input: chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_fixed(40, 40, area), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_chat_layout_without_options() {
        let layout = chat_layout(Rect::new(0, 0, 80, 23), 0);
        assert_eq!(layout.options.height, 0);
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.transcript.height, 20);
    }

    #[test]
    fn test_chat_layout_with_options() {
        let layout = chat_layout(Rect::new(0, 0, 80, 23), 2);
        assert_eq!(layout.options.height, 4);
        assert_eq!(layout.transcript.height, 16);
    }
}
