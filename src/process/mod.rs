//! External R console session: lazy creation, text injection, focus, teardown.
//!
//! At most one console is live at a time. [`Session`] is a cheap clonable
//! handle threaded through the handlers; the console itself sits behind a
//! [`TerminalFactory`] so hosts and tests can supply their own.

use std::sync::{Arc, Weak};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub mod r;

/// One live interactive console.
#[async_trait]
pub trait Terminal: Send {
    /// Write `text` as if typed at the prompt, followed by a newline.
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Bring the console's output surface into view.
    fn show(&mut self);
}

/// Creates consoles. The factory must arrange for `closed` to fire when the
/// console goes away on its own (process exit, user closing it).
#[async_trait]
pub trait TerminalFactory: Send + Sync {
    async fn spawn(&self, closed: CloseSignal) -> Result<Box<dyn Terminal>>;
}

#[derive(Default)]
struct Slot {
    live: Option<Box<dyn Terminal>>,
    generation: u64,
}

/// Session-closed notification bound to the console generation it was issued for.
#[derive(Clone)]
pub struct CloseSignal {
    slot: Weak<Mutex<Slot>>,
    generation: u64,
}

impl CloseSignal {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear the session's handle, unless a newer console has replaced it meanwhile.
    pub async fn fire(self) {
        let Some(slot) = self.slot.upgrade() else { return };
        let mut slot = slot.lock().await;
        if slot.generation == self.generation && slot.live.take().is_some() {
            tracing::info!(generation = self.generation, "R console closed");
        }
    }
}

#[derive(Clone)]
pub struct Session {
    factory: Arc<dyn TerminalFactory>,
    slot: Arc<Mutex<Slot>>,
}

impl Session {
    pub fn new(factory: Arc<dyn TerminalFactory>) -> Self {
        Self { factory, slot: Arc::new(Mutex::new(Slot::default())) }
    }

    /// Create a console if none is live. A no-op while one exists.
    pub async fn ensure(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        if slot.live.is_some() {
            return Ok(());
        }
        let generation = slot.generation + 1;
        let signal = CloseSignal { slot: Arc::downgrade(&self.slot), generation };
        let terminal = self.factory.spawn(signal).await?;
        slot.generation = generation;
        slot.live = Some(terminal);
        tracing::info!(generation, "R console created");
        Ok(())
    }

    /// Fire-and-forget text injection. Callers must `ensure()` first.
    pub async fn send(&self, text: &str) {
        let mut slot = self.slot.lock().await;
        let Some(terminal) = slot.live.as_mut() else {
            tracing::warn!("no live R console; dropping input");
            return;
        };
        if let Err(e) = terminal.send_text(text).await {
            tracing::warn!(error = %e, "failed to write to R console");
        }
    }

    pub async fn show(&self) {
        if let Some(terminal) = self.slot.lock().await.live.as_mut() {
            terminal.show();
        }
    }

    /// The console was closed by someone else; forget it so the next
    /// `ensure()` starts a fresh one.
    pub async fn on_closed(&self) {
        let mut slot = self.slot.lock().await;
        if slot.live.take().is_some() {
            tracing::info!(generation = slot.generation, "R console handle cleared");
        }
    }

    pub async fn is_live(&self) -> bool {
        self.slot.lock().await.live.is_some()
    }

    /// Number of consoles created so far.
    pub async fn generation(&self) -> u64 {
        self.slot.lock().await.generation
    }
}

/// Where input goes after it is sent, parsed from `source.focus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPolicy {
    Terminal,
    Editor,
}

impl FocusPolicy {
    pub fn parse(value: &str) -> Self {
        if value == "terminal" {
            Self::Terminal
        } else {
            Self::Editor
        }
    }

    pub async fn apply(self, session: &Session) {
        if self == Self::Terminal {
            session.show().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Recorder {
        spawned: StdMutex<Vec<CloseSignal>>,
    }

    struct Null;

    #[async_trait]
    impl Terminal for Null {
        async fn send_text(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }
        fn show(&mut self) {}
    }

    #[async_trait]
    impl TerminalFactory for Recorder {
        async fn spawn(&self, closed: CloseSignal) -> Result<Box<dyn Terminal>> {
            self.spawned.lock().unwrap().push(closed);
            Ok(Box::new(Null))
        }
    }

    #[tokio::test]
    async fn stale_close_signal_keeps_newer_console() {
        let factory = Arc::new(Recorder::default());
        let session = Session::new(factory.clone());

        session.ensure().await.unwrap();
        let first = factory.spawned.lock().unwrap()[0].clone();
        first.clone().fire().await;
        assert!(!session.is_live().await);

        session.ensure().await.unwrap();
        assert_eq!(session.generation().await, 2);
        first.fire().await;
        assert!(session.is_live().await);
    }

    #[test]
    fn focus_policy_only_matches_terminal() {
        assert_eq!(FocusPolicy::parse("terminal"), FocusPolicy::Terminal);
        assert_eq!(FocusPolicy::parse("editor"), FocusPolicy::Editor);
        assert_eq!(FocusPolicy::parse("Terminal"), FocusPolicy::Editor);
    }
}
