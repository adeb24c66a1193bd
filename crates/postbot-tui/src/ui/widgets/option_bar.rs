//! Row of quick-reply buttons.

use crate::ui::theme::Styles;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use unicode_width::UnicodeWidthStr;

/// Space between two buttons on a row.
const GAP: usize = 1;

fn button_label(label: &str) -> String {
    format!("[ {label} ]")
}

/// Flow buttons into rows no wider than `width`.
///
/// Returns button indices per row. A button wider than the row still gets
/// a row of its own and is clipped when drawn.
pub fn option_rows<S: AsRef<str>>(labels: &[S], width: u16) -> Vec<Vec<usize>> {
    let width = usize::from(width);
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut used = 0;

    for (i, label) in labels.iter().enumerate() {
        let w = button_label(label.as_ref()).width();
        match rows.last_mut() {
            Some(row) if used + GAP + w <= width => {
                row.push(i);
                used += GAP + w;
            }
            _ => {
                rows.push(vec![i]);
                used = w;
            }
        }
    }
    rows
}

/// First row to draw so the row holding `selected` fits in `height` rows.
fn first_visible_row(rows: &[Vec<usize>], selected: usize, height: usize) -> usize {
    let selected_row = rows
        .iter()
        .position(|row| row.contains(&selected))
        .unwrap_or(0);
    (selected_row + 1).saturating_sub(height.max(1))
}

/// Quick-reply buttons; the selected one is highlighted when focused.
#[derive(Debug, Clone)]
pub struct OptionBar<'a> {
    labels: Vec<&'a str>,
    selected: usize,
    focused: bool,
}

impl<'a> OptionBar<'a> {
    pub fn new(labels: Vec<&'a str>) -> Self {
        Self {
            labels,
            selected: 0,
            focused: false,
        }
    }

    #[must_use]
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for OptionBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let right = area.x.saturating_add(area.width);
        let rows = option_rows(self.labels.as_slice(), area.width);
        let first = first_visible_row(&rows, self.selected, usize::from(area.height));

        for (row_index, row) in rows.iter().skip(first).enumerate() {
            let Ok(dy) = u16::try_from(row_index) else {
                break;
            };
            if dy >= area.height {
                break;
            }
            let y = area.y + dy;
            let mut x = area.x;
            for &i in row {
                if x >= right {
                    break;
                }
                let style = if self.focused && i == self.selected {
                    Styles::option_selected()
                } else {
                    Styles::option()
                };
                let text = button_label(self.labels[i]);
                let (next_x, _) = buf.set_stringn(x, y, &text, usize::from(right - x), style);
                x = next_x.saturating_add(1);
            }
        }
    }
}
