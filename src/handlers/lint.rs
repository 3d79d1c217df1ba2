//! Reporting lintr results to the host.

use std::path::Path;

use anyhow::Result;

use crate::{extension::Extension, lint::Severity};

pub async fn lint_and_report(ext: &Extension, path: &Path) -> Result<()> {
    let diagnostics = ext.linter.lint(path).await?;
    if diagnostics.is_empty() {
        ext.host.show_info(&format!("{}: no lints", path.display()));
        return Ok(());
    }
    for d in &diagnostics {
        match d.severity {
            Severity::Error => ext.host.show_error(&d.to_string()),
            Severity::Warning => ext.host.show_warning(&d.to_string()),
            Severity::Style => ext.host.show_info(&d.to_string()),
        }
    }
    Ok(())
}
