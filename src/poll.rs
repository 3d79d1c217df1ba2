//! Waiting on a write performed by a process we do not control.
//!
//! There is no completion signal from the R console, so the only thing we can
//! do is sample the output file's size until two consecutive samples agree.
//! This is a heuristic: a writer that pauses for longer than one interval is
//! indistinguishable from one that has finished.

use std::{io, path::PathBuf, time::Duration};

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

/// Export files larger than this are not worth opening in a viewer.
pub const SIZE_CEILING: u64 = 20_000_000;
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Something whose size can be observed from outside.
#[async_trait]
pub trait SizeProbe: Send {
    async fn sample(&mut self) -> io::Result<u64>;
}

/// Samples the byte length of a file on disk.
#[derive(Debug, Clone)]
pub struct FileSizeProbe {
    path: PathBuf,
}

impl FileSizeProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SizeProbe for FileSizeProbe {
    async fn sample(&mut self) -> io::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub ceiling: u64,
    /// Overall limit; `None` polls until stable or over the ceiling.
    pub timeout: Option<Duration>,
    /// Refuse to call a zero-byte file finished.
    pub require_nonempty: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            ceiling: SIZE_CEILING,
            timeout: None,
            require_nonempty: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Two consecutive samples matched.
    Stable(u64),
    /// A sample went past the ceiling.
    Exceeded(u64),
    TimedOut,
    /// The probe could no longer be sampled.
    Vanished,
}

/// Sample `probe` every `policy.interval` until the size stops changing.
///
/// Each decision compares against the immediately preceding sample only.
pub async fn await_stable<P: SizeProbe + ?Sized>(
    probe: &mut P,
    policy: &PollPolicy,
) -> PollOutcome {
    let deadline = policy.timeout.map(|t| Instant::now() + t);
    let mut previous: Option<u64> = None;

    loop {
        let size = match probe.sample().await {
            Ok(size) => size,
            Err(e) => {
                tracing::debug!(error = %e, "size probe failed");
                return PollOutcome::Vanished;
            }
        };
        tracing::trace!(size, ?previous, "polled export size");

        if size > policy.ceiling {
            return PollOutcome::Exceeded(size);
        }
        if previous == Some(size) && !(policy.require_nonempty && size == 0) {
            return PollOutcome::Stable(size);
        }
        previous = Some(size);

        if deadline.is_some_and(|d| Instant::now() + policy.interval > d) {
            return PollOutcome::TimedOut;
        }
        sleep(policy.interval).await;
    }
}
