//! Mermaid diagram rendering via the mermaid.ink service for mdink.
//!
//! This crate turns the mermaid code blocks of a document into SVG image
//! files:
//! - [`MermaidClient`] fetches rendered SVGs from a mermaid.ink-compatible
//!   service, one diagram per request
//! - [`ChunkRenderer`] splits oversized diagrams into chunks the service can
//!   handle and estimates a layout height per rendered image
//! - [`image_tag`] emits the `<img>` markup with height-tiered styling and
//!   split-diagram annotations
//!
//! Render failures never abort a run: a placeholder artifact is written and a
//! human-readable warning is appended to the caller-supplied collector.

mod chunk;
mod client;
mod consts;
mod error;
mod image_tag;

pub use chunk::{ChunkRenderer, RenderedChunk};
pub use client::{DiagramRenderer, MermaidClient};
pub use consts::PAGE_BREAK;
pub use error::DiagramError;
pub use image_tag::image_tag;
