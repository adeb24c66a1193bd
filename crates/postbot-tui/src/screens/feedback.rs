//! Feedback modal, drawn over the chat window when the user closes it.

use crate::app::{App, FeedbackRow};
use crate::screens::chat::ChatScreen;
use crate::screens::Screen;
use crate::ui::theme::{star_line, Styles};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{centered_fixed, main_layout};
use postbot_engine::{Emoji, MAX_STARS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const HINTS: [KeyHint; 4] = [
    KeyHint::new("1-5", "Rate"),
    KeyHint::new("Enter", "Submit"),
    KeyHint::new("x", "End chat"),
    KeyHint::new("Esc", "Back"),
];

/// Chat window with the feedback modal on top.
pub struct FeedbackScreen;

impl Screen for FeedbackScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        ChatScreen.render(app, area, buf);

        let (main_area, status_area) = main_layout(area);
        render_modal(app, main_area, buf);

        StatusBar::new("Feedback")
            .hints(&HINTS)
            .right(app.notification.as_deref())
            .render(status_area, buf);
    }
}

fn render_modal(app: &App, area: Rect, buf: &mut Buffer) {
    let modal_area = centered_fixed(40, 11, area);
    Clear.render(modal_area, buf);

    let block = Block::default()
        .title(" Before you go ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let panel = app.conversation.feedback();
    let row_marker = |row: FeedbackRow| {
        if app.feedback_row == row {
            Span::styled("> ", Styles::active())
        } else {
            Span::styled("  ", Styles::default())
        }
    };

    let mut emoji_spans = vec![row_marker(FeedbackRow::Emojis)];
    for (i, emoji) in Emoji::all().into_iter().enumerate() {
        let style = if app.feedback_row == FeedbackRow::Emojis && i == app.selected_emoji {
            Styles::option_selected()
        } else {
            Styles::default()
        };
        emoji_spans.push(Span::styled(format!(" {} ", emoji.glyph()), style));
        emoji_spans.push(Span::raw(" "));
    }

    let submit_style = if panel.can_submit() {
        Styles::option_selected()
    } else {
        Styles::dim().add_modifier(Modifier::CROSSED_OUT)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  How was your experience?", Styles::highlight())),
        Line::from(""),
        Line::from(vec![
            row_marker(FeedbackRow::Stars),
            Span::styled(star_line(panel.rating().stars(), MAX_STARS), Styles::star()),
            Span::styled(format!("  {}/{MAX_STARS}", panel.rating().stars()), Styles::dim()),
        ]),
        Line::from(""),
        Line::from(emoji_spans),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(" Submit ", submit_style),
        ]),
    ];

    Paragraph::new(lines).block(block).render(modal_area, buf);
}
