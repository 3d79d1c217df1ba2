//! The editor side of the bridge: user messages, opening files, the data viewer.

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::{
    config::Config,
    document::Document,
    printer::{csv_to_markdown, MarkdownPrinter, StatusPrinter, Tone},
};

#[async_trait]
pub trait Host: Send + Sync {
    fn show_info(&self, message: &str);
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);

    async fn open_document(&self, path: &Path) -> Result<Document>;

    /// Hand an opened document to the data viewer. Resolves when the viewer is done with it.
    async fn preview(&self, document: &Document) -> Result<()>;
}

/// Host for a plain terminal: messages on stderr, tables on stdout.
pub struct TerminalHost {
    viewer: Option<String>,
    max_rows: usize,
}

impl TerminalHost {
    pub fn new(viewer: Option<String>, max_rows: usize) -> Self {
        Self { viewer, max_rows }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.get_non_empty("CSV_VIEWER"),
            cfg.get_usize("PREVIEW_MAX_ROWS").unwrap_or(100),
        )
    }
}

#[async_trait]
impl Host for TerminalHost {
    fn show_info(&self, message: &str) {
        tracing::info!("{message}");
        StatusPrinter::new(Tone::Info).print(message);
    }

    fn show_warning(&self, message: &str) {
        tracing::warn!("{message}");
        StatusPrinter::new(Tone::Warning).print(message);
    }

    fn show_error(&self, message: &str) {
        tracing::error!("{message}");
        StatusPrinter::new(Tone::Error).print(message);
    }

    async fn open_document(&self, path: &Path) -> Result<Document> {
        let text = tokio::fs::read_to_string(path).await?;
        let mut doc = Document::from_text(&text);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    async fn preview(&self, document: &Document) -> Result<()> {
        let (Some(spec), Some(path)) = (&self.viewer, &document.path) else {
            let table = csv_to_markdown(&document.text(), self.max_rows);
            MarkdownPrinter::default().print(&table);
            return Ok(());
        };
        let Some((program, args)) = viewer_command(spec) else {
            bail!("CSV_VIEWER is blank");
        };
        tracing::debug!(%program, ?args, file = %path.display(), "opening viewer");
        let status = Command::new(&program)
            .args(&args)
            .arg(path)
            .status()
            .await
            .with_context(|| format!("failed to run viewer `{program}`"))?;
        if !status.success() {
            bail!("viewer `{spec}` exited with {status}");
        }
        Ok(())
    }
}

/// Split a `CSV_VIEWER` value into a program and its leading arguments.
/// The file path is passed as one more argument; no shell is involved.
pub fn viewer_command(spec: &str) -> Option<(String, Vec<String>)> {
    let mut words = spec.split_whitespace().map(str::to_string);
    let program = words.next()?;
    Some((program, words.collect()))
}
