//! Script buffer state: the active document and its cursor/selection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Zero-based line and character (char index, not byte offset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A selection; empty when `anchor == active`, in which case `active` is the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    pub fn caret(at: Position) -> Self {
        Self { anchor: at, active: at }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// `(start, end)` in document order.
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.active {
            (self.anchor, self.active)
        } else {
            (self.active, self.anchor)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub lines: Vec<String>,
    pub dirty: bool,
    /// Line terminator found on disk, reused when saving.
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let line_ending = if text.contains("\r\n") { LineEnding::CrLf } else { LineEnding::Lf };
        Self {
            path: None,
            lines,
            dirty: false,
            line_ending,
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Open `path`; a missing file yields an empty buffer that still has to be written.
    pub fn open(path: &Path) -> Result<Self> {
        let mut doc = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file '{}'", path.display()))?;
            Self::from_text(&text)
        } else {
            let mut doc = Self::from_text("");
            doc.trailing_newline = true;
            doc.dirty = true;
            doc
        };
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replace the buffer contents and mark it modified.
    pub fn set_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.dirty = true;
    }

    pub fn text(&self) -> String {
        let eol = self.line_ending.as_str();
        let mut text = self.lines.join(eol);
        if self.trailing_newline {
            text.push_str(eol);
        }
        text
    }

    /// Write the buffer to its path if it has unsaved changes, and return that path.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .path
            .clone()
            .context("Document has no file path; save it to disk first")?;
        if !self.dirty && path.exists() {
            return Ok(path);
        }
        fs::write(&path, self.text())
            .with_context(|| format!("Failed to write file '{}'", path.display()))?;
        self.dirty = false;
        Ok(path)
    }
}

/// The active document together with its selection.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    pub document: Document,
    pub selection: Selection,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self { document, selection: Selection::default() }
    }

    pub fn cursor(&self) -> Position {
        self.selection.active
    }

    /// Place the caret at the start of `line`, clamped to the document.
    pub fn goto_line(&mut self, line: usize) {
        let last = self.document.line_count().saturating_sub(1);
        self.selection = Selection::caret(Position::new(line.min(last), 0));
    }

    /// Collapse the selection and move the caret one line down.
    pub fn move_cursor_down(&mut self) {
        let last = self.document.line_count().saturating_sub(1);
        let active = self.selection.active;
        let line = (active.line + 1).min(last);
        self.selection = Selection::caret(Position::new(line, active.character));
    }
}
