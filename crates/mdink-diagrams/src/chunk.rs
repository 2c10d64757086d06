//! Splitting oversized diagrams into renderable chunks.
//!
//! The rendering service rejects diagrams beyond a size limit, so long
//! descriptions are rendered as a sequence of images of at most
//! [`CHUNK_LINES`] source lines each. Sequence diagrams only stay readable
//! when every chunk repeats the participant declarations, so the prefix up to
//! the last `participant` line is prepended to every chunk after the first.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::client::DiagramRenderer;
use crate::consts::{CHUNK_LINES, HEIGHT_BASELINE, LINE_HEIGHT};
use crate::error::DiagramError;

static PARTICIPANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("participant .*").unwrap());

/// One rendered image of a diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChunk {
    /// Path of the written SVG artifact.
    pub file: PathBuf,
    /// Estimated layout height, proportional to the chunk's source line
    /// count. May be negative for very short chunks; downstream styling
    /// relies on the raw value, so it is never clamped.
    pub height: i32,
}

/// Renders a diagram description as one or more chunked images.
pub struct ChunkRenderer<'a, R> {
    renderer: &'a R,
}

impl<'a, R: DiagramRenderer> ChunkRenderer<'a, R> {
    /// Create a chunk renderer delegating to `renderer` per chunk.
    pub fn new(renderer: &'a R) -> Self {
        Self { renderer }
    }

    /// Render block `index` and return its images in chunk order.
    ///
    /// Artifacts are named `diagram_{index}.svg`, or `diagram_{index}_{k}.svg`
    /// when the description needs more than one chunk, and written under
    /// `image_dir`. Returns [`DiagramError::MissingHeader`] when chunking is
    /// required but the description has no participant declaration.
    pub fn render(
        &self,
        index: usize,
        source: &str,
        image_dir: &Path,
        endpoint: &str,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<RenderedChunk>, DiagramError> {
        let lines: Vec<&str> = source.split('\n').collect();
        let chunk_count = lines.len().div_ceil(CHUNK_LINES);

        let header = if chunk_count > 1 {
            Some(chunk_header(source).ok_or(DiagramError::MissingHeader {
                index,
                limit: CHUNK_LINES,
            })?)
        } else {
            None
        };

        let mut rendered = Vec::with_capacity(chunk_count);
        for (k, window) in lines.chunks(CHUNK_LINES).enumerate() {
            let mut text = String::new();
            if k > 0
                && let Some(header) = &header
            {
                text.push_str(header);
            }
            text.push_str(&window.join("\n"));

            let file_name = if chunk_count > 1 {
                format!("diagram_{index}_{k}.svg")
            } else {
                format!("diagram_{index}.svg")
            };
            let dest = image_dir.join(file_name);
            self.renderer.render_svg(&text, &dest, endpoint, warnings)?;

            let line_count = i32::try_from(text.split('\n').count()).unwrap_or(i32::MAX);
            rendered.push(RenderedChunk {
                file: dest,
                height: (line_count - HEIGHT_BASELINE) * LINE_HEIGHT,
            });
        }
        Ok(rendered)
    }
}

/// Prefix of `source` up to and including the last participant declaration,
/// with a trailing newline. None when no declaration exists.
fn chunk_header(source: &str) -> Option<String> {
    let last = PARTICIPANT_RE.find_iter(source).last()?;
    let mut header = source[..last.end()].to_owned();
    header.push('\n');
    Some(header)
}
