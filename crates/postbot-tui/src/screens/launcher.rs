//! Launcher screen, shown while the chat window is closed.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

const HINTS: [KeyHint; 3] = [
    KeyHint::new("Enter", "Chat"),
    KeyHint::new("F1", "Help"),
    KeyHint::new("q", "Quit"),
];

/// The launcher screen: a single "open chat" button.
pub struct LauncherScreen;

impl Screen for LauncherScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        let content_area = centered_fixed(52, 11, main_area);
        let block = Block::default()
            .title(format!(" {} ", app.title))
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Questions about parcels, post offices, or services?",
                Styles::default(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  ", Styles::default()),
                Span::styled(" Chat with us ", Styles::option_selected()),
                Span::styled("  press Enter", Styles::dim()),
            ]),
            Line::from(""),
        ];
        if !app.conversation.transcript().is_empty() {
            lines.push(Line::from(Span::styled(
                "  Your conversation is still here.",
                Styles::dim(),
            )));
        }
        lines.push(Line::from(vec![
            Span::styled("  Endpoint: ", Styles::dim()),
            Span::styled(app.endpoint.as_str(), Styles::default()),
        ]));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(content_area, buf);

        StatusBar::new("Postbot")
            .hints(&HINTS)
            .right(app.notification.as_deref())
            .render(status_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_screen_to_string};

    #[test]
    fn test_launcher_shows_title_and_endpoint() {
        let app = create_test_app();
        let result = render_screen_to_string(&LauncherScreen, &app);
        assert!(result.contains("India Post Assistant"));
        assert!(result.contains("Chat with us"));
        assert!(result.contains("127.0.0.1:5000/chatbot"));
        assert!(result.contains("Enter"));
    }

    #[test]
    fn test_launcher_shows_notification() {
        let mut app = create_test_app();
        app.notification = Some("Thanks for your feedback!".into());
        let result = render_screen_to_string(&LauncherScreen, &app);
        assert!(result.contains("Thanks for your feedback!"));
    }
}
