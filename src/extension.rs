//! Context threaded through every command: config, the R session, the host.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::{
    commands::Command,
    config::Config,
    document::Editor,
    events::EditorEvent,
    handlers,
    host::{Host, TerminalHost},
    integration,
    lint::Linter,
    preview::Previewer,
    process::{r::RTerminalFactory, FocusPolicy, Session},
    scratch,
};

pub struct Extension {
    pub config: Config,
    pub session: Session,
    pub host: Arc<dyn Host>,
    pub previewer: Previewer,
    pub linter: Linter,
    pub workspace: PathBuf,
}

impl Extension {
    pub fn new(
        config: Config,
        session: Session,
        host: Arc<dyn Host>,
        previewer: Previewer,
        workspace: PathBuf,
    ) -> Self {
        let linter = Linter::from_config(&config);
        Self { config, session, host, previewer, linter, workspace }
    }

    /// Wire up the real R console, terminal host and platform scratch strategy.
    pub fn from_config(config: Config, workspace: PathBuf) -> Self {
        let session = Session::new(Arc::new(RTerminalFactory::from_config(&config)));
        let host = Arc::new(TerminalHost::from_config(&config));
        let previewer = Previewer::from_config(&config, scratch::for_platform());
        Self::new(config, session, host, previewer, workspace)
    }

    pub fn focus(&self) -> FocusPolicy {
        FocusPolicy::parse(&self.config.source_focus())
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub async fn execute(&self, command: Command, editor: &mut Editor) -> Result<()> {
        tracing::debug!(%command, "executing");
        match command {
            Command::RunFile => handlers::run::run_file(self, editor, false).await,
            Command::RunFileWithEcho => handlers::run::run_file(self, editor, true).await,
            Command::RunSelection => handlers::run::run_selection(self, editor).await,
            Command::CreateSession => {
                self.session.ensure().await?;
                self.session.show().await;
                Ok(())
            }
            Command::CreateGitignore => {
                let path = integration::create_gitignore(&self.workspace, false)?;
                self.host.show_info(&format!("Created {}", path.display()));
                Ok(())
            }
            Command::RunLinter => {
                let path = editor.document.save()?;
                handlers::lint::lint_and_report(self, &path).await
            }
            Command::InstallLinter => {
                self.host.show_info("Installing lintr...");
                self.linter.install().await.context("lintr installation failed")?;
                self.host.show_info("lintr installed");
                Ok(())
            }
            Command::PreviewDataframe => {
                self.previewer
                    .preview_selection(&self.session, self.host.as_ref(), &self.workspace, editor)
                    .await;
                Ok(())
            }
        }
    }

    pub async fn handle_event(&self, event: EditorEvent) {
        match event {
            EditorEvent::DocumentSaved(path) => {
                if !self.config.get_bool("LINT_ON_SAVE") {
                    return;
                }
                if let Err(e) = handlers::lint::lint_and_report(self, &path).await {
                    self.host.show_warning(&format!("Linting failed: {e:#}"));
                }
            }
            EditorEvent::SessionClosed => self.session.on_closed().await,
        }
    }
}
