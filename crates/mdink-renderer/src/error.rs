//! Document processing error types.

use mdink_diagrams::DiagramError;

/// Hard errors from document processing.
///
/// Per-diagram render failures are collected as warnings in the
/// [`ProcessedDocument`](crate::ProcessedDocument) instead.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Diagram rendering failed in a way that cannot be skipped.
    #[error("{0}")]
    Diagram(#[from] DiagramError),
}
