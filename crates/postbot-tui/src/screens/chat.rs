//! Chat window: transcript, option buttons, and the input line.

use crate::app::{App, Focus};
use crate::screens::Screen;
use crate::ui::theme::{spinner, Styles};
use crate::ui::widgets::option_bar::option_rows;
use crate::ui::widgets::{KeyHint, OptionBar, StatusBar};
use crate::ui::{chat_layout, main_layout};
use postbot_engine::Sender;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const INPUT_HINTS: [KeyHint; 5] = [
    KeyHint::new("Enter", "Send"),
    KeyHint::new("Tab", "Options"),
    KeyHint::new("Ctrl+R", "Restart"),
    KeyHint::new("Esc", "Close"),
    KeyHint::new("F1", "Help"),
];

const OPTION_HINTS: [KeyHint; 4] = [
    KeyHint::new("←/→", "Choose"),
    KeyHint::new("Enter", "Pick"),
    KeyHint::new("Tab", "Input"),
    KeyHint::new("Esc", "Close"),
];

const USER_PREFIX: &str = "You: ";
const BOT_PREFIX: &str = "Bot: ";

/// The open chat window.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        let labels: Vec<&str> = app
            .conversation
            .options()
            .iter()
            .map(|o| o.text.as_str())
            .collect();
        let rows = option_rows(labels.as_slice(), main_area.width.saturating_sub(2));
        let row_count = u16::try_from(rows.len()).unwrap_or(u16::MAX).min(4);
        let layout = chat_layout(main_area, row_count);

        render_transcript(app, layout.transcript, buf);
        if row_count > 0 {
            render_options(app, labels, layout.options, buf);
        }
        render_input(app, layout.input, buf);

        let hints: &[KeyHint] = match app.focus {
            Focus::Input => &INPUT_HINTS,
            Focus::Options => &OPTION_HINTS,
        };
        StatusBar::new("Chat")
            .hints(hints)
            .right(app.notification.as_deref())
            .render(status_area, buf);
    }
}

/// Wrap the transcript and loading indicators to `width` columns.
pub fn transcript_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width).max(USER_PREFIX.len() + 1);
    let mut lines = Vec::new();

    for message in app.conversation.transcript().messages() {
        let (prefix, style) = match message.sender {
            Sender::User => (USER_PREFIX, Styles::user()),
            Sender::Bot => (BOT_PREFIX, Styles::bot()),
        };
        let indent = " ".repeat(prefix.width());
        let options = textwrap::Options::new(width)
            .initial_indent(prefix)
            .subsequent_indent(&indent);

        for (i, wrapped) in textwrap::wrap(&message.text, options).into_iter().enumerate() {
            let body = wrapped.get(prefix.len()..).unwrap_or_default().to_string();
            let lead = if i == 0 {
                Span::styled(prefix, style)
            } else {
                Span::styled(indent.clone(), Styles::default())
            };
            lines.push(Line::from(vec![lead, Span::styled(body, Styles::default())]));
        }
        lines.push(Line::from(""));
    }

    for placeholder in app.conversation.placeholders() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", spinner(app.tick)), Styles::active()),
            Span::styled(placeholder.text.clone(), Styles::placeholder()),
        ]));
    }

    lines
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(format!(" {} ", app.title))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    let lines = transcript_lines(app, inner.width);
    let height = usize::from(inner.height);
    let max_scroll = lines.len().saturating_sub(height);
    let start = max_scroll.saturating_sub(app.transcript_scroll.min(max_scroll));
    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

    Paragraph::new(visible)
        .style(Styles::default())
        .render(inner, buf);
}

fn render_options(app: &App, labels: Vec<&str>, area: Rect, buf: &mut Buffer) {
    let focused = app.focus == Focus::Options;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    OptionBar::new(labels)
        .selected(app.selected_option)
        .focused(focused)
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default());

    app.input_state
        .widget()
        .block(block)
        .focused(focused)
        .placeholder("Type your message...")
        .render(area, buf);
}
