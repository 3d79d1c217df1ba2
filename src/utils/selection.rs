//! Text to send for the current cursor/selection.

use crate::document::{Document, Position, Selection};

/// The highlighted text if the selection is non-empty, otherwise the whole cursor line.
pub fn current_selection_text(doc: &Document, selection: &Selection) -> String {
    if selection.is_empty() {
        return doc.line(selection.active.line).unwrap_or_default().to_string();
    }
    let (start, end) = selection.ordered();
    text_between(doc, start, end)
}

/// True when the first non-space character is R's comment marker.
pub fn is_comment_line(text: &str) -> bool {
    text.trim_start_matches(' ').starts_with('#')
}

fn text_between(doc: &Document, start: Position, end: Position) -> String {
    let mut out = String::new();
    for line_no in start.line..=end.line {
        let Some(line) = doc.line(line_no) else { break };
        let from = if line_no == start.line { start.character } else { 0 };
        let to = if line_no == end.line { end.character } else { usize::MAX };
        if line_no > start.line {
            out.push('\n');
        }
        out.extend(line.chars().skip(from).take(to.saturating_sub(from)));
    }
    out
}
