//! Events the host delivers to the bridge.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A document was written to disk
    DocumentSaved(PathBuf),
    /// The R console was closed by the user or the host
    SessionClosed,
}
