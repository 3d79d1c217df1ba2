//! Conversion of arbitrary text into R string literals.

use std::path::Path;

/// Render `value` as an R string literal delimited by `quote`.
///
/// `None` renders as R's `NULL`. The result can be spliced directly into a
/// line sent to the interpreter.
pub fn quote_r(value: Option<&str>, quote: char) -> String {
    let Some(s) = value else {
        return "NULL".to_string();
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{07}' => out.push_str("\\a"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{0B}' => out.push_str("\\v"),
            other => out.push(other),
        }
    }
    out.push(quote);
    out
}

/// Double-quoted R literal for a filesystem path.
pub fn quote_path(path: &Path) -> String {
    quote_r(Some(&path.to_string_lossy()), '"')
}
