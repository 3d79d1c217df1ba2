//! Sending code to R: whole files via `source()`, or line by line.

use std::path::Path;

use anyhow::Result;

use crate::{
    document::Editor,
    events::EditorEvent,
    extension::Extension,
    utils::{current_selection_text, is_comment_line, quote_path, quote_r},
};

/// `source("<path>"[, encoding = "<enc>"][, echo = TRUE])`
pub fn source_command(path: &Path, encoding: Option<&str>, echo: bool) -> String {
    let mut cmd = format!("source({}", quote_path(path));
    if let Some(enc) = encoding {
        cmd.push_str(&format!(", encoding = {}", quote_r(Some(enc), '"')));
    }
    if echo {
        cmd.push_str(", echo = TRUE");
    }
    cmd.push(')');
    cmd
}

/// Save the active document and source it in the R console.
///
/// Save subscribers (the linter) only hear about the save once the
/// `source()` line is already with R.
pub async fn run_file(ext: &Extension, editor: &mut Editor, echo: bool) -> Result<()> {
    let path = editor.document.save()?;

    let encoding = ext.config.source_encoding();
    let cmd = source_command(&path, encoding.as_deref(), echo);

    ext.session.ensure().await?;
    ext.session.send(&cmd).await;
    ext.focus().apply(&ext.session).await;

    ext.handle_event(EditorEvent::DocumentSaved(path)).await;
    Ok(())
}

/// Send the selection (or cursor line) and step the cursor down. Comment
/// lines are skipped, but the cursor still moves.
pub async fn run_selection(ext: &Extension, editor: &mut Editor) -> Result<()> {
    let text = current_selection_text(&editor.document, &editor.selection);
    if !is_comment_line(&text) {
        ext.session.ensure().await?;
        ext.session.send(&text).await;
    }
    editor.move_cursor_down();
    ext.focus().apply(&ext.session).await;
    Ok(())
}
