//! Colors, symbols, and shared styles for the postbot TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(220, 60, 60);
    pub const ACCENT_DIM: Color = Color::Rgb(140, 60, 60);

    // Chat bubbles
    pub const USER: Color = Color::Rgb(130, 170, 255);
    pub const BOT: Color = Color::Rgb(240, 200, 100);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const STATUS_KEY_BG: Color = Color::Rgb(120, 50, 50);

    pub const STAR: Color = Color::Rgb(255, 200, 40);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(220, 60, 60);
}

/// Text symbols.
pub struct Symbols;

impl Symbols {
    pub const STAR_FILLED: &'static str = "★";
    pub const STAR_EMPTY: &'static str = "☆";
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Sender label for the user's lines.
    pub fn user() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Sender label for the bot's lines.
    pub fn bot() -> Style {
        Style::default()
            .fg(Palette::BOT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading placeholder.
    pub fn placeholder() -> Style {
        Self::dim().add_modifier(Modifier::ITALIC)
    }

    /// An option button.
    pub fn option() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// The focused option button.
    pub fn option_selected() -> Style {
        Style::default()
            .fg(Palette::BG)
            .bg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Star rating glyphs.
    pub fn star() -> Style {
        Style::default().fg(Palette::STAR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Render a star rating, e.g. `★★★☆☆`.
pub fn star_line(stars: u8, max: u8) -> String {
    (1..=max)
        .map(|i| {
            if i <= stars {
                Symbols::STAR_FILLED
            } else {
                Symbols::STAR_EMPTY
            }
        })
        .collect()
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_star_line() {
        assert_snapshot!(star_line(3, 5), @"★★★☆☆");
        assert_eq!(star_line(0, 5), "☆☆☆☆☆");
        assert_eq!(star_line(5, 5), "★★★★★");
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(0), "|");
        assert_eq!(spinner(5), "/");
    }
}
