//! Screen definitions for the postbot TUI.

pub mod chat;
pub mod feedback;
pub mod launcher;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Chat window
    Enter             Send message / pick option
    Tab               Switch between input and options
    Up/Down           Input history
    PgUp/PgDn         Scroll transcript
    Ctrl+R            Start over
    Ctrl+O            Open/close the chat window
    Esc               Close (asks for feedback)

  Feedback
    1-5 or Left/Right Star rating
    Up/Down           Stars or emoji row
    x                 End chat

    F1                Toggle this help
    Ctrl+C            Quit
";

    let width = 56.min(area.width.saturating_sub(4));
    let height = 22.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
