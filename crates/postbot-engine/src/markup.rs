//! Flatten reply markup into terminal text.
//!
//! Replies are written for an HTML chat bubble and may contain line
//! breaks, emphasis, list items, and links. The terminal only shows text.

use regex::{Captures, Regex};
use std::sync::OnceLock;

struct Patterns {
    line_break: Regex,
    paragraph: Regex,
    list_item: Regex,
    link: Regex,
    tag: Regex,
    blank_lines: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        line_break: Regex::new(r"(?i)<br\s*/?>").expect("valid regex"),
        paragraph: Regex::new(r"(?i)</p>\s*<p[^>]*>").expect("valid regex"),
        list_item: Regex::new(r"(?i)<li[^>]*>").expect("valid regex"),
        link: Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
            .expect("valid regex"),
        tag: Regex::new(r"<[^>]+>").expect("valid regex"),
        blank_lines: Regex::new(r"\n{3,}").expect("valid regex"),
    })
}

/// Convert an HTML reply fragment to plain text.
pub fn to_plain_text(html: &str) -> String {
    let p = patterns();

    let text = p.line_break.replace_all(html, "\n");
    let text = p.paragraph.replace_all(&text, "\n");
    let text = p.list_item.replace_all(&text, "\n- ");
    let text = p.link.replace_all(&text, |caps: &Captures<'_>| {
        let href = &caps[1];
        let label = p.tag.replace_all(&caps[2], "");
        if label.trim().is_empty() || label.trim() == href {
            href.to_string()
        } else {
            format!("{} ({href})", label.trim())
        }
    });
    let text = p.tag.replace_all(&text, "");
    let text = decode_entities(&text);

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    p.blank_lines
        .replace_all(joined.trim(), "\n\n")
        .into_owned()
}

/// Decode character references line by line.
///
/// Tags are already gone, so each line is plain text with entities. The
/// wrap width leaves room for the whole line so nothing is re-wrapped.
fn decode_entities(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.contains('&') {
                let decoded = html2text::from_read(line.as_bytes(), line.len() + 8);
                decoded.trim_end().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
