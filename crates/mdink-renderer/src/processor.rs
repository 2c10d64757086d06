//! End-to-end markdown processing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use mdink_diagrams::{ChunkRenderer, DiagramRenderer, image_tag};

use crate::cleanup;
use crate::error::ProcessError;
use crate::html;

/// Line marker preceding a diagram block that names its endpoint.
const ENDPOINT_MARKER: &str = "Endpoint:";

static MERMAID_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid(.*?)```").unwrap());

/// Result of processing one document.
#[derive(Debug)]
pub struct ProcessedDocument {
    /// Print-ready HTML with rendered diagrams and page-break divs.
    pub html: String,
    /// Image artifacts produced during rendering, in document order.
    pub images: Vec<PathBuf>,
    /// Per-diagram render warnings, in occurrence order. Non-fatal: every
    /// block was still substituted with an artifact.
    pub warnings: Vec<String>,
}

/// Orchestrates diagram extraction, rendering, substitution, HTML conversion
/// and page-break wrapping.
///
/// Generic over the [`DiagramRenderer`] seam so tests can substitute the
/// rendering service.
pub struct DocumentProcessor<R> {
    renderer: R,
    image_dir: PathBuf,
}

impl<R: DiagramRenderer> DocumentProcessor<R> {
    /// Create a processor writing image artifacts under `image_dir`.
    pub fn new(renderer: R, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            image_dir: image_dir.into(),
        }
    }

    /// Process a document. See [`Self::process_with_progress`].
    pub fn process(&self, document: &str) -> Result<ProcessedDocument, ProcessError> {
        self.process_with_progress(document, |_, _| {})
    }

    /// Process a document, reporting `(done, total)` after each diagram
    /// block completes.
    ///
    /// Blocks are rendered sequentially in document order. Each fenced
    /// mermaid block is replaced, exactly once, by the markup for its
    /// rendered images; cleanup runs after every substitution so positions
    /// stay consistent. The finished text is converted to HTML and its
    /// page-break sections wrapped from the recorded image heights.
    pub fn process_with_progress(
        &self,
        document: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<ProcessedDocument, ProcessError> {
        let blocks: Vec<String> = MERMAID_BLOCK_RE
            .captures_iter(document)
            .map(|captures| captures[1].to_owned())
            .collect();
        let total = blocks.len();

        let chunker = ChunkRenderer::new(&self.renderer);
        let mut content = document.to_owned();
        let mut heights: HashMap<String, i32> = HashMap::new();
        let mut images = Vec::new();
        let mut warnings = Vec::new();

        for (index, code) in blocks.iter().enumerate() {
            let endpoint = endpoint_label(document, code, index);
            let clean_code = sanitize(code);
            let chunks =
                chunker.render(index, &clean_code, &self.image_dir, &endpoint, &mut warnings)?;

            let mut fragment = String::new();
            let count = chunks.len();
            for (position, chunk) in chunks.iter().enumerate() {
                let name = leaf_name(&chunk.file);
                let previous = heights.insert(name, chunk.height);
                debug_assert!(
                    previous.is_none(),
                    "duplicate rendered file name for diagram {index}"
                );
                fragment.push_str(&image_tag(
                    &chunk.file.display().to_string(),
                    chunk.height,
                    count - position,
                ));
                images.push(chunk.file.clone());
            }

            let section = format!("```mermaid{code}```");
            content = content.replacen(&section, &fragment, 1);
            content = cleanup::clean(&content);
            progress(index + 1, total);
        }

        let converted = html::markdown_to_html(&content);
        let wrapped = html::wrap_page_sections(&converted, &heights);
        let enhanced = cleanup::enhance_api_links(&wrapped);

        log_largest_heights(&heights);

        Ok(ProcessedDocument {
            html: enhanced,
            images,
            warnings,
        })
    }
}

/// Replace characters the rendering service misinterprets and trim.
///
/// Question marks make the service return 404, so they become plus signs
/// before rendering. Idempotent.
fn sanitize(code: &str) -> String {
    code.replace('?', "+").trim().to_owned()
}

/// Endpoint label for the block at `index`: the text after the colon of the
/// nearest `Endpoint:` line preceding the block in the original document,
/// else a generated placeholder.
fn endpoint_label(document: &str, code: &str, index: usize) -> String {
    let section = format!("```mermaid{code}```");
    if let Some(position) = document.find(&section) {
        for line in document[..position].lines().rev() {
            if line.contains(ENDPOINT_MARKER) {
                if let Some((_, rest)) = line.split_once(':') {
                    return rest.trim().to_owned();
                }
            }
        }
    }
    format!("Endpoint_{index}")
}

fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Log the five largest recorded image heights, descending.
fn log_largest_heights(heights: &HashMap<String, i32>) {
    let mut ranked: Vec<_> = heights.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (name, height) in ranked.into_iter().take(5) {
        debug!(%name, height, "largest rendered diagrams");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use mdink_diagrams::DiagramError;

    /// Renders nothing; records what would have been rendered.
    #[derive(Default)]
    struct StubRenderer {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl DiagramRenderer for StubRenderer {
        fn render_svg(
            &self,
            source: &str,
            _dest: &Path,
            endpoint: &str,
            _warnings: &mut Vec<String>,
        ) -> Result<(), DiagramError> {
            self.calls
                .borrow_mut()
                .push((source.to_owned(), endpoint.to_owned()));
            Ok(())
        }
    }

    fn processor() -> DocumentProcessor<StubRenderer> {
        DocumentProcessor::new(StubRenderer::default(), "img")
    }

    #[test]
    fn test_sanitize_replaces_question_marks() {
        assert_eq!(sanitize(" a?b?c \n"), "a+b+c");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("GET /users?id=1");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_endpoint_label_from_preceding_line() {
        let document = "Endpoint: http://example.com\n```mermaid\nA->>B: hi\n```";
        assert_eq!(
            endpoint_label(document, "\nA->>B: hi\n", 0),
            "http://example.com"
        );
    }

    #[test]
    fn test_endpoint_label_nearest_preceding_wins() {
        let document = "Endpoint: http://a\ntext\nEndpoint: http://b\n```mermaid\nX\n```";
        assert_eq!(endpoint_label(document, "\nX\n", 0), "http://b");
    }

    #[test]
    fn test_endpoint_label_placeholder_when_absent() {
        let document = "intro\n```mermaid\nX\n```";
        assert_eq!(endpoint_label(document, "\nX\n", 4), "Endpoint_4");
    }

    #[test]
    fn test_document_without_blocks_passes_through() {
        let result = processor().process("# Title\n\njust text\n").unwrap();
        assert!(result.images.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_single_block_end_to_end() {
        let lines = (0..10)
            .map(|i| format!("A->>B: step {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let document =
            format!("# Doc\n\nEndpoint: http://x\n\n```mermaid\n{lines}\n```\n\ntail\n");

        let processor = processor();
        let result = processor.process(&document).unwrap();

        // One rendered image whose 10-line description estimates to height 0,
        // so the compact tier applies.
        assert_eq!(result.images, vec![Path::new("img").join("diagram_0.svg")]);
        assert!(result.html.contains(
            r#"<img src="img/diagram_0.svg" style="max-height: 40%; width: 90%;">"#
        ));
        assert!(!result.html.contains("```mermaid"));
        assert!(!result.html.contains("Splitted Diagram"));

        let calls = processor.renderer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "http://x");
    }

    #[test]
    fn test_block_description_sanitized_before_rendering() {
        let document = "```mermaid\nA->>B: what?\n```";
        let processor = processor();
        processor.process(document).unwrap();
        assert_eq!(processor.renderer.calls.borrow()[0].0, "A->>B: what+");
    }

    #[test]
    fn test_each_block_substituted_once_in_order() {
        let document = "```mermaid\nfirst\n```\nmiddle\n```mermaid\nsecond\n```\n";
        let result = processor().process(document).unwrap();

        assert_eq!(
            result.images,
            vec![
                Path::new("img").join("diagram_0.svg"),
                Path::new("img").join("diagram_1.svg"),
            ]
        );
        let first = result.html.find("diagram_0.svg").unwrap();
        let second = result.html.find("diagram_1.svg").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_split_block_wraps_chunks_in_pages() {
        let lines = std::iter::once("participant A".to_owned())
            .chain((0..79).map(|i| format!("A->>B: step {i}")))
            .collect::<Vec<_>>()
            .join("\n");
        let document = format!("intro\n\n```mermaid\n{lines}\n```\n\ntail\n");

        let result = processor().process(&document).unwrap();

        assert_eq!(result.images.len(), 2);
        assert!(result.html.contains("Splitted Diagram"));
        // The first chunk's trailing page break makes the wrapper kick in;
        // its section is first in the document, so it gets a normal page.
        assert!(result.html.contains(r#"<div class="normal-page">"#));
        assert!(result.html.contains("diagram_0_0.svg"));
    }

    #[test]
    fn test_progress_reported_per_block() {
        let document = "```mermaid\na\n```\n\n```mermaid\nb\n```\n";
        let seen = RefCell::new(Vec::new());
        processor()
            .process_with_progress(document, |done, total| {
                seen.borrow_mut().push((done, total));
            })
            .unwrap();
        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_details_wrapper_cleaned_after_substitution() {
        let document =
            "<details open><summary>diagrams</summary>\n\n```mermaid\nX\n```\n\n</details>\n";
        let result = processor().process(document).unwrap();
        assert!(!result.html.contains("<details"));
        assert!(!result.html.contains("<summary>"));
    }

    #[test]
    fn test_api_links_enhanced_in_output() {
        let document = "Documentation for the API: https://example.com/docs<br>\n";
        let result = processor().process(document).unwrap();
        assert!(result
            .html
            .contains(r#"<a href="https://example.com/docs" class="modern-link">"#));
    }
}
