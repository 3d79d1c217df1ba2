//! Test doubles: a recording host and a fake R console that acts on `write.csv(...)`.

#![allow(dead_code)]

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use rbridge::{
    config::Config,
    document::Document,
    extension::Extension,
    host::Host,
    poll::PollPolicy,
    preview::Previewer,
    process::{CloseSignal, Session, Terminal, TerminalFactory},
    scratch::DotDirScratch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Default)]
pub struct MockHost {
    pub messages: Mutex<Vec<(Level, String)>>,
    pub previewed: Mutex<Vec<String>>,
    pub fail_preview: bool,
    /// Lines the watched console had received when each message arrived.
    pub sent_at_message: Mutex<Vec<usize>>,
    watched: Option<Arc<Mutex<Vec<String>>>>,
}

impl MockHost {
    pub fn failing() -> Self {
        Self { fail_preview: true, ..Self::default() }
    }

    pub fn watching(r: &FakeR) -> Self {
        Self { watched: Some(r.sent.clone()), ..Self::default() }
    }

    fn record(&self, level: Level, message: &str) {
        if let Some(sent) = &self.watched {
            let count = sent.lock().unwrap().len();
            self.sent_at_message.lock().unwrap().push(count);
        }
        self.messages.lock().unwrap().push((level, message.to_string()));
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.messages().into_iter().map(|(l, _)| l).collect()
    }

    pub fn previewed(&self) -> Vec<String> {
        self.previewed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for MockHost {
    fn show_info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn show_warning(&self, message: &str) {
        self.record(Level::Warning, message);
    }

    fn show_error(&self, message: &str) {
        self.record(Level::Error, message);
    }

    async fn open_document(&self, path: &Path) -> Result<Document> {
        let text = tokio::fs::read_to_string(path).await?;
        let mut doc = Document::from_text(&text);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    async fn preview(&self, document: &Document) -> Result<()> {
        if self.fail_preview {
            bail!("viewer crashed");
        }
        self.previewed.lock().unwrap().push(document.text());
        Ok(())
    }
}

/// What the fake R does when asked to `write.csv`.
#[derive(Debug, Clone)]
pub enum Export {
    /// Write the whole file at once.
    Write(String),
    /// Never write anything.
    Ignore,
    /// Append `chunk` bytes `times` times, `every` apart.
    Grow { chunk: usize, times: usize, every: Duration },
}

#[derive(Clone)]
pub struct FakeR {
    pub export: Export,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub shown: Arc<Mutex<usize>>,
    pub spawned: Arc<Mutex<Vec<CloseSignal>>>,
}

impl FakeR {
    pub fn new(export: Export) -> Self {
        Self {
            export,
            sent: Arc::default(),
            shown: Arc::default(),
            spawned: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }

    pub fn shown(&self) -> usize {
        *self.shown.lock().unwrap()
    }
}

struct FakeTerminal {
    r: FakeR,
}

/// Pull the destination out of `write.csv(x, file = "...", ...)`.
fn export_target(line: &str) -> Option<PathBuf> {
    let start = line.find("file = \"")? + "file = \"".len();
    let end = line[start..].find("\", row.names")? + start;
    Some(PathBuf::from(line[start..end].replace("\\\\", "\\")))
}

#[async_trait]
impl Terminal for FakeTerminal {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.r.sent.lock().unwrap().push(text.to_string());
        let target = text.starts_with("write.csv(").then(|| export_target(text)).flatten();
        let Some(target) = target else {
            return Ok(());
        };
        match self.r.export.clone() {
            Export::Write(content) => std::fs::write(&target, content)?,
            Export::Ignore => {}
            Export::Grow { chunk, times, every } => {
                // Created once; later appends fail (and stop) once the file is deleted.
                std::fs::write(&target, vec![b'x'; chunk])?;
                tokio::spawn(async move {
                    for _ in 1..times {
                        tokio::time::sleep(every).await;
                        let appended = std::fs::OpenOptions::new()
                            .append(true)
                            .open(&target)
                            .and_then(|mut f| f.write_all(&vec![b'x'; chunk]));
                        if appended.is_err() {
                            return;
                        }
                    }
                });
            }
        }
        Ok(())
    }

    fn show(&mut self) {
        *self.r.shown.lock().unwrap() += 1;
    }
}

#[async_trait]
impl TerminalFactory for FakeR {
    async fn spawn(&self, closed: CloseSignal) -> Result<Box<dyn Terminal>> {
        self.spawned.lock().unwrap().push(closed);
        Ok(Box::new(FakeTerminal { r: self.clone() }))
    }
}

pub fn session(r: &FakeR) -> Session {
    Session::new(Arc::new(r.clone()))
}

pub fn previewer(policy: PollPolicy) -> Previewer {
    Previewer::new(Arc::new(DotDirScratch), policy)
}

/// An extension over the fake R and mock host. Linting is off unless `pairs` turns it on.
pub fn extension(
    r: &FakeR,
    host: Arc<MockHost>,
    workspace: &Path,
    pairs: &[(&str, &str)],
) -> Extension {
    let mut all = vec![("LINT_ON_SAVE", "false")];
    all.extend_from_slice(pairs);
    let config = Config::from_pairs(all);
    Extension::new(
        config,
        session(r),
        host,
        previewer(PollPolicy::default()),
        workspace.to_path_buf(),
    )
}
