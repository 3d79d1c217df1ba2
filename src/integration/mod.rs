//! Workspace scaffolding: an R-flavoured `.gitignore`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

const R_GITIGNORE: &str = r#"# History files
.Rhistory
.Rapp.history

# Session Data files
.RData
.RDataTmp

# User-specific files
.Ruserdata

# Example code in package build process
*-Ex.R

# Output files from R CMD build
/*.tar.gz

# Output files from R CMD check
/*.Rcheck/

# RStudio files
.Rproj.user/

# produced vignettes
vignettes/*.html
vignettes/*.pdf

# OAuth2 token, see https://github.com/hadley/httr/releases/tag/v0.3
.httr-oauth

# knitr and R markdown default cache directories
*_cache/
/cache/

# Temporary files created by R markdown
*.utf8.md
*.knit.md

# R Environment Variables
.Renviron

# pkgdown site
docs/

# translation temp files
po/*~

# rbridge scratch directory
.tmp/
tmp/
"#;

/// Write the template to `<workspace>/.gitignore`; refuse to clobber unless `force`.
pub fn create_gitignore(workspace: &Path, force: bool) -> Result<PathBuf> {
    let path = workspace.join(".gitignore");
    if path.exists() && !force {
        bail!(".gitignore already exists in {}", workspace.display());
    }
    write_file(&path, R_GITIGNORE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote .gitignore");
    Ok(path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut f = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
    f.write_all(content.as_bytes())?;
    Ok(())
}
