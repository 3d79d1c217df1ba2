//! lintr runner and installer, driven through `Rscript`.

use std::{path::Path, sync::OnceLock, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde::Serialize;
use tokio::{process::Command, time::timeout};

use crate::{config::Config, utils::quote_path};

pub const LINTR_REPOS: &str = "https://cloud.r-project.org";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Style,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sev = match self.severity {
            Severity::Style => "style",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}:{}:{}: {}: {}", self.file, self.line, self.column, sev, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct Linter {
    rscript: String,
    timeout: Duration,
}

impl Linter {
    pub fn new(rscript: impl Into<String>, timeout: Duration) -> Self {
        Self { rscript: rscript.into(), timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let secs = cfg.get_usize("LINT_TIMEOUT").unwrap_or(60) as u64;
        Self::new(cfg.rscript(), Duration::from_secs(secs))
    }

    /// Lint one file and return what lintr reported.
    pub async fn lint(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let expr = format!("print(lintr::lint({}))", quote_path(path));
        let stdout = self.rscript_eval(&expr).await?;
        Ok(parse_lint_output(&stdout))
    }

    pub async fn install(&self) -> Result<()> {
        let expr = format!(
            "install.packages(\"lintr\", repos = \"{LINTR_REPOS}\")"
        );
        self.rscript_eval(&expr).await?;
        Ok(())
    }

    async fn rscript_eval(&self, expr: &str) -> Result<String> {
        tracing::debug!(rscript = %self.rscript, %expr, "evaluating");
        let fut = Command::new(&self.rscript)
            .arg("-e")
            .arg(expr)
            .kill_on_drop(true)
            .output();
        let output = timeout(self.timeout, fut)
            .await
            .map_err(|_| anyhow!("`{}` timed out after {:?}", self.rscript, self.timeout))?
            .with_context(|| format!("failed to run `{}`", self.rscript))?;
        if !output.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                self.rscript,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn diagnostic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<file>.+?):(?P<line>\d+):(?P<col>\d+): ",
            r"(?P<sev>style|warning|error): (?P<msg>.*)$",
        ))
        .expect("diagnostic pattern is valid")
    })
}

/// Pick the `file:line:col: severity: message` lines out of lintr's printout,
/// skipping the echoed source and caret lines.
pub fn parse_lint_output(text: &str) -> Vec<Diagnostic> {
    text.lines()
        .filter_map(|line| {
            let caps = diagnostic_re().captures(line.trim_end())?;
            let severity = match &caps["sev"] {
                "style" => Severity::Style,
                "warning" => Severity::Warning,
                _ => Severity::Error,
            };
            Some(Diagnostic {
                file: caps["file"].to_string(),
                line: caps["line"].parse().ok()?,
                column: caps["col"].parse().ok()?,
                severity,
                message: caps["msg"].to_string(),
            })
        })
        .collect()
}
