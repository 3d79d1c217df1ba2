//! Hidden per-workspace scratch directory for staging exported data.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

/// How a platform names and hides the scratch directory.
pub trait ScratchStrategy: Send + Sync {
    fn dir_name(&self) -> &'static str;

    /// Create `dir` (and parents) and mark it hidden.
    fn prepare(&self, dir: &Path) -> io::Result<()>;
}

/// POSIX: a leading dot is all it takes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotDirScratch;

impl ScratchStrategy for DotDirScratch {
    fn dir_name(&self) -> &'static str {
        ".tmp"
    }

    fn prepare(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }
}

/// Windows: a plain `tmp` folder with the hidden attribute set.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttribScratch;

impl ScratchStrategy for AttribScratch {
    fn dir_name(&self) -> &'static str {
        "tmp"
    }

    fn prepare(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let status = std::process::Command::new("attrib")
            .arg("+h")
            .arg(dir)
            .status();
        // The directory is usable either way; hiding is cosmetic.
        match status {
            Ok(s) if s.success() => {}
            Ok(s) => tracing::warn!(%s, dir = %dir.display(), "attrib +h failed"),
            Err(e) => tracing::warn!(error = %e, dir = %dir.display(), "could not run attrib"),
        }
        Ok(())
    }
}

/// Pick the strategy for the platform we were built for.
pub fn for_platform() -> Arc<dyn ScratchStrategy> {
    if cfg!(windows) {
        Arc::new(AttribScratch)
    } else {
        Arc::new(DotDirScratch)
    }
}

/// A resolved scratch directory under a workspace root.
#[derive(Clone)]
pub struct ScratchDir {
    path: PathBuf,
    strategy: Arc<dyn ScratchStrategy>,
}

impl ScratchDir {
    pub fn resolve(workspace: &Path, strategy: Arc<dyn ScratchStrategy>) -> Self {
        Self { path: workspace.join(strategy.dir_name()), strategy }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create(&self) -> io::Result<()> {
        if self.path.is_dir() {
            return Ok(());
        }
        self.strategy.prepare(&self.path)
    }

    pub fn file(&self, stem: &str, ext: &str) -> PathBuf {
        self.path.join(format!("{stem}.{ext}"))
    }

    /// Delete the directory and everything in it. Missing is fine.
    pub async fn remove(&self) -> io::Result<()> {
        match tokio::fs::remove_dir_all(&self.path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl std::fmt::Debug for ScratchDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchDir").field("path", &self.path).finish()
    }
}
