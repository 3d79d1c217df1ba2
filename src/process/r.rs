//! R console process bootstrap and stdin glue.

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use owo_colors::OwoColorize;
use tokio::{
    io::AsyncWriteExt,
    process::{ChildStdin, Command},
};

use super::{CloseSignal, Terminal, TerminalFactory};
use crate::config::Config;

/// Spawns `R` with piped stdin; output goes straight to our terminal.
#[derive(Debug, Clone)]
pub struct RTerminalFactory {
    program: String,
    args: Vec<String>,
}

impl RTerminalFactory {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.r_term(), cfg.r_term_args())
    }
}

#[async_trait]
impl TerminalFactory for RTerminalFactory {
    async fn spawn(&self, closed: CloseSignal) -> Result<Box<dyn Terminal>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start R console `{}`", self.program))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("no stdin"))?;

        let generation = closed.generation();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::info!(%status, generation, "R console exited"),
                Err(e) => tracing::warn!(error = %e, generation, "lost track of R console"),
            }
            closed.fire().await;
        });

        Ok(Box::new(RTerminal { stdin, shown: false }))
    }
}

pub struct RTerminal {
    stdin: ChildStdin,
    shown: bool,
}

#[async_trait]
impl Terminal for RTerminal {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stdin.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.stdin.write_all(b"\n").await?;
        }
        self.stdin.flush().await?;
        Ok(())
    }

    fn show(&mut self) {
        if !self.shown {
            eprintln!("{}", "── R console ──".dimmed());
            self.shown = true;
        }
    }
}
