//! Diagram rendering error types.

use std::path::PathBuf;

/// Hard errors from diagram rendering.
///
/// Render failures reported by the service are not errors: they are recorded
/// as warnings and a placeholder artifact is written so processing continues.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// A description needed chunking but no participant declaration was
    /// found to build the repeated chunk header from.
    #[error(
        "diagram {index}: description exceeds {limit} lines but contains no \
         'participant' declaration to repeat per chunk"
    )]
    MissingHeader {
        /// Zero-based index of the diagram block in the document.
        index: usize,
        /// Chunk size limit in source lines.
        limit: usize,
    },

    /// Writing the image artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Artifact destination path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
