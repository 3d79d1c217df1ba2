//! Data frame preview: have R export an object to CSV, wait for the file to
//! settle, then hand it to the viewer.
//!
//! Flow for one invocation:
//!
//! 1. validate the selected name (no side effects on failure)
//! 2. create the hidden scratch directory and send `write.csv(...)` to R
//! 3. wait [`SETTLE_DELAY`], then require the file to exist
//! 4. poll its size until two samples agree or it passes the ceiling
//! 5. open and preview it
//!
//! The scratch directory is removed after every attempt that created it.

use std::{path::Path, sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config::Config,
    document::Editor,
    host::Host,
    poll::{await_stable, FileSizeProbe, PollOutcome, PollPolicy},
    process::Session,
    scratch::{ScratchDir, ScratchStrategy},
    utils::{current_selection_text, quote_path},
};

mod error;

pub use error::PreviewError;

/// Newly created files may report a stale size for a short while.
pub const SETTLE_DELAY: Duration = Duration::from_millis(350);

/// Object names we are willing to splice into an R command.
pub fn is_valid_target(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// R line that writes `name` to `path` without row names or quoting.
pub fn export_command(name: &str, path: &Path) -> String {
    format!(
        "write.csv({name}, file = {}, row.names = FALSE, quote = FALSE)",
        quote_path(path)
    )
}

pub struct Previewer {
    strategy: Arc<dyn ScratchStrategy>,
    policy: PollPolicy,
    settle: Duration,
    in_flight: Mutex<()>,
}

impl Previewer {
    pub fn new(strategy: Arc<dyn ScratchStrategy>, policy: PollPolicy) -> Self {
        Self { strategy, policy, settle: SETTLE_DELAY, in_flight: Mutex::new(()) }
    }

    pub fn from_config(cfg: &Config, strategy: Arc<dyn ScratchStrategy>) -> Self {
        let policy = PollPolicy {
            timeout: cfg.get_duration_ms("PREVIEW_TIMEOUT_MS"),
            require_nonempty: cfg.get_bool("PREVIEW_REQUIRE_NONEMPTY"),
            ..PollPolicy::default()
        };
        Self::new(strategy, policy)
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Preview the object named by the editor's current selection.
    pub async fn preview_selection(
        &self,
        session: &Session,
        host: &dyn Host,
        workspace: &Path,
        editor: &Editor,
    ) -> bool {
        let candidate = current_selection_text(&editor.document, &editor.selection);
        self.preview_dataframe(session, host, workspace, candidate.trim()).await
    }

    /// Export `name` from the R session and show it. Failures are reported to
    /// `host`; the return value only says whether the viewer was reached.
    pub async fn preview_dataframe(
        &self,
        session: &Session,
        host: &dyn Host,
        workspace: &Path,
        name: &str,
    ) -> bool {
        match self.run(session, host, workspace, name).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = ?e, name, "preview failed");
                e.report(host);
                false
            }
        }
    }

    async fn run(
        &self,
        session: &Session,
        host: &dyn Host,
        workspace: &Path,
        name: &str,
    ) -> Result<(), PreviewError> {
        session.ensure().await.map_err(PreviewError::Session)?;
        if !is_valid_target(name) {
            return Err(PreviewError::InvalidTarget(name.to_string()));
        }

        // One export at a time: concurrent runs would share the scratch directory.
        let _guard = self.in_flight.lock().await;

        let scratch = ScratchDir::resolve(workspace, self.strategy.clone());
        let result = self.export_and_show(session, host, &scratch, name).await;
        if let Err(e) = scratch.remove().await {
            tracing::warn!(
                error = %e,
                dir = %scratch.path().display(),
                "failed to remove scratch directory"
            );
        }
        result
    }

    async fn export_and_show(
        &self,
        session: &Session,
        host: &dyn Host,
        scratch: &ScratchDir,
        name: &str,
    ) -> Result<(), PreviewError> {
        scratch.create()?;
        let file = scratch.file(name, "csv");
        session.send(&export_command(name, &file)).await;

        tokio::time::sleep(self.settle).await;
        if !tokio::fs::try_exists(&file).await.unwrap_or(false) {
            return Err(PreviewError::ExportNotStarted(file));
        }

        let mut probe = FileSizeProbe::new(&file);
        match await_stable(&mut probe, &self.policy).await {
            PollOutcome::Stable(size) => {
                tracing::debug!(size, file = %file.display(), "export settled");
            }
            PollOutcome::Exceeded(size) => {
                let ceiling = self.policy.ceiling;
                return Err(PreviewError::SizeExceeded { size, ceiling });
            }
            PollOutcome::TimedOut => {
                let limit = self.policy.timeout.unwrap_or_default();
                return Err(PreviewError::TimedOut(limit));
            }
            PollOutcome::Vanished => return Err(PreviewError::Vanished(file)),
        }

        let document = host.open_document(&file).await.map_err(PreviewError::Viewer)?;
        host.preview(&document).await.map_err(PreviewError::Viewer)
    }
}
