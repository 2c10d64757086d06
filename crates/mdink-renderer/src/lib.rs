//! Markdown document processing for mdink.
//!
//! [`DocumentProcessor`] drives the end-to-end text transform: it extracts
//! mermaid code blocks, renders them to SVG images through
//! [`mdink_diagrams`], substitutes the rendered image markup back into the
//! document, converts the result to HTML, and wraps the sections between
//! page-break markers in styled divs sized from the recorded image heights.
//!
//! All state (the height registry and the warning collector) is confined to
//! one [`DocumentProcessor::process`] call; the processor itself can be
//! reused across documents.

mod cleanup;
mod error;
mod html;
mod processor;

pub use error::ProcessError;
pub use processor::{DocumentProcessor, ProcessedDocument};
