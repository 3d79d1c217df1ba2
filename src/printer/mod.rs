//! Printers: status lines on stderr and markdown tables (termimad) on stdout.

use std::io;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use termimad::MadSkin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Warning,
    Error,
}

impl Tone {
    fn label(self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }
}

/// Prints one status message per line, prefixed by its tone.
pub struct StatusPrinter {
    tone: Tone,
    color: bool,
}

impl StatusPrinter {
    pub fn new(tone: Tone) -> Self {
        Self { tone, color: io::stderr().is_terminal() }
    }

    pub fn print(&self, message: &str) {
        eprintln!("{}", self.format(message));
    }

    fn format(&self, message: &str) -> String {
        let label = self.tone.label();
        if !self.color {
            return format!("{label}: {message}");
        }
        let label = match self.tone {
            Tone::Info => label.cyan().to_string(),
            Tone::Warning => label.yellow().bold().to_string(),
            Tone::Error => label.red().bold().to_string(),
        };
        format!("{label}: {message}")
    }
}

#[derive(Default)]
pub struct MarkdownPrinter {
    skin: MadSkin,
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Render unquoted CSV (as written by `write.csv(quote = FALSE)`) as a markdown table.
///
/// The first line is the header. At most `max_rows` data rows are kept; a
/// trailing note says how many were left out.
pub fn csv_to_markdown(csv: &str, max_rows: usize) -> String {
    let mut lines = csv.lines().filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return "*(empty)*\n".to_string();
    };
    let columns: Vec<&str> = header.split(',').collect();

    let mut md = String::new();
    push_row(&mut md, &columns);
    md.push('|');
    for _ in &columns {
        md.push_str(":-|");
    }
    md.push('\n');

    let mut omitted = 0usize;
    for (i, line) in lines.enumerate() {
        if i >= max_rows {
            omitted += 1;
            continue;
        }
        push_row(&mut md, &line.split(',').collect::<Vec<_>>());
    }
    if omitted > 0 {
        md.push_str(&format!("\n*{omitted} more rows not shown*\n"));
    }
    md
}

fn push_row(md: &mut String, cells: &[&str]) {
    md.push('|');
    for cell in cells {
        md.push_str(&cell.replace('|', "\\|"));
        md.push('|');
    }
    md.push('\n');
}
