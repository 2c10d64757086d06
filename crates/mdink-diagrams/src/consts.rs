//! Internal constants for diagram rendering.

/// Page-break marker understood by the HTML-to-PDF engine.
///
/// Used both as a section delimiter during page wrapping and as the suffix
/// appended after every chunk of a split diagram.
pub const PAGE_BREAK: &str = r#"<div style="page-break-after: always;"></div>"#;

/// Maximum mermaid source lines per rendered image.
///
/// The mermaid.ink service rejects larger diagrams, so descriptions are split
/// into chunks of at most this many lines.
pub const CHUNK_LINES: usize = 50;

/// Layout units per mermaid source line in the height estimate.
pub const LINE_HEIGHT: i32 = 14;

/// Source lines subtracted before scaling the height estimate.
pub const HEIGHT_BASELINE: i32 = 10;

/// Below this estimated height an image gets the compact style.
pub const COMPACT_MAX_HEIGHT: i32 = 150;

/// Below this estimated height an image gets the medium style.
pub const MEDIUM_MAX_HEIGHT: i32 = 400;
