use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::host::Host;

/// Why a data-frame preview did not reach the viewer.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("`{0}` does not look like an R object name")]
    InvalidTarget(String),

    #[error("Export failed: {} was not created", .0.display())]
    ExportNotStarted(PathBuf),

    #[error("Exported file is {size} bytes, larger than the {ceiling} byte limit")]
    SizeExceeded { size: u64, ceiling: u64 },

    #[error("Export failed: {} disappeared while being written", .0.display())]
    Vanished(PathBuf),

    #[error("Export did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("Could not start R: {0:#}")]
    Session(anyhow::Error),

    #[error("Scratch directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not show preview: {0:#}")]
    Viewer(anyhow::Error),
}

impl PreviewError {
    /// Surface the failure with the severity the user should see.
    pub fn report(&self, host: &dyn Host) {
        let message = self.to_string();
        match self {
            Self::InvalidTarget(_) => host.show_info(&message),
            Self::SizeExceeded { .. } | Self::TimedOut(_) => host.show_warning(&message),
            Self::ExportNotStarted(_)
            | Self::Vanished(_)
            | Self::Session(_)
            | Self::Io(_)
            | Self::Viewer(_) => {
                host.show_error(&message)
            }
        }
    }
}
