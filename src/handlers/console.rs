//! Line-oriented console: holds one R script as the active document and
//! turns typed commands into bridge commands.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use is_terminal::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    commands::Command,
    document::{Document, Editor, Position, Selection},
    events::EditorEvent,
    extension::Extension,
};

/// One line typed at the console prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Empty,
    Help,
    Quit,
    /// Move to a 1-based line
    Goto(usize),
    Select(Position, Position),
    /// Preview an object by name, ignoring the selection
    View(String),
    Save,
    /// Close the R console
    Close,
    Show,
    Run(Command),
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };
        let rest: Vec<&str> = words.collect();
        let input = match (head, rest.as_slice()) {
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            ("save", []) => Self::Save,
            ("close", []) => Self::Close,
            ("show", []) => Self::Show,
            ("goto", [n]) => {
                let n: usize = n.parse().map_err(|_| anyhow!("not a line number: {n}"))?;
                if n == 0 {
                    bail!("lines are numbered from 1");
                }
                Self::Goto(n)
            }
            ("select", [from, to]) => Self::Select(parse_position(from)?, parse_position(to)?),
            ("view", [name]) => Self::View(name.to_string()),
            (cmd, []) => Self::Run(cmd.parse()?),
            _ => bail!("unrecognised input: {line}"),
        };
        Ok(input)
    }
}

/// `LINE:COL`, both 1-based.
fn parse_position(s: &str) -> Result<Position> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected LINE:COL, got {s}"))?;
    let line: usize = line.parse().map_err(|_| anyhow!("bad line in {s}"))?;
    let col: usize = col.parse().map_err(|_| anyhow!("bad column in {s}"))?;
    if line == 0 || col == 0 {
        bail!("positions are 1-based: {s}");
    }
    Ok(Position::new(line - 1, col - 1))
}

fn print_help() {
    println!("Commands:");
    for c in Command::ALL {
        println!("  {:<14} {:<22} {}", c.alias(), c.id(), c.description());
    }
    println!("  {:<14} {:<22} {}", "goto N", "", "Move the cursor to line N");
    println!("  {:<14} {:<22} {}", "select A B", "", "Select from LINE:COL to LINE:COL");
    println!("  {:<14} {:<22} {}", "view NAME", "", "Preview the data frame NAME");
    println!("  {:<14} {:<22} {}", "show", "", "Print the cursor line");
    println!("  {:<14} {:<22} {}", "save", "", "Write the file");
    println!("  {:<14} {:<22} {}", "close", "", "Close the R console");
    println!("  {:<14} {:<22} {}", "quit", "", "Leave rbridge");
}

/// Apply one parsed input. Returns `false` when the console should exit.
pub async fn dispatch(ext: &Extension, editor: &mut Editor, input: ConsoleInput) -> Result<bool> {
    match input {
        ConsoleInput::Empty => {}
        ConsoleInput::Help => print_help(),
        ConsoleInput::Quit => return Ok(false),
        ConsoleInput::Goto(n) => editor.goto_line(n - 1),
        ConsoleInput::Select(from, to) => editor.selection = Selection::new(from, to),
        ConsoleInput::View(name) => {
            ext.previewer
                .preview_dataframe(&ext.session, ext.host.as_ref(), ext.workspace(), &name)
                .await;
        }
        ConsoleInput::Save => {
            let path = editor.document.save()?;
            ext.handle_event(EditorEvent::DocumentSaved(path)).await;
        }
        ConsoleInput::Close => ext.handle_event(EditorEvent::SessionClosed).await,
        ConsoleInput::Show => {
            let line = editor.cursor().line;
            println!("{:>4} {}", line + 1, editor.document.line(line).unwrap_or_default());
        }
        ConsoleInput::Run(command) => ext.execute(command, editor).await?,
    }
    Ok(true)
}

/// Run the console on stdin until `quit` or end of input.
pub async fn run(ext: &Extension, file: &Path) -> Result<()> {
    let mut editor = Editor::new(Document::open(file)?);
    let interactive = io::stdin().is_terminal();
    if interactive {
        eprintln!(
            "Editing {} ({} lines). Type `help` for commands.",
            file.display(),
            editor.document.line_count()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("{}:{}> ", file.display(), editor.cursor().line + 1);
            io::stdout().flush().ok();
        }
        let Some(line) = lines.next_line().await? else { break };

        let input = match ConsoleInput::parse(&line) {
            Ok(input) => input,
            Err(e) => {
                ext.host.show_error(&e.to_string());
                continue;
            }
        };
        match dispatch(ext, &mut editor, input).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => ext.host.show_error(&format!("{e:#}")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(ConsoleInput::parse("  ").unwrap(), ConsoleInput::Empty);
        assert_eq!(ConsoleInput::parse("goto 3").unwrap(), ConsoleInput::Goto(3));
        assert_eq!(
            ConsoleInput::parse("select 1:1 2:4").unwrap(),
            ConsoleInput::Select(Position::new(0, 0), Position::new(1, 3))
        );
        assert!(ConsoleInput::parse("goto 0").is_err());
        assert!(ConsoleInput::parse("select 0:1 1:1").is_err());
    }

    #[test]
    fn parses_commands_by_alias_and_id() {
        assert_eq!(ConsoleInput::parse("run").unwrap(), ConsoleInput::Run(Command::RunSelection));
        assert_eq!(
            ConsoleInput::parse("r.previewDataframe").unwrap(),
            ConsoleInput::Run(Command::PreviewDataframe)
        );
        assert_eq!(ConsoleInput::parse("view df").unwrap(), ConsoleInput::View("df".into()));
        assert!(ConsoleInput::parse("frobnicate").is_err());
        assert!(ConsoleInput::parse("run now please").is_err());
    }
}
