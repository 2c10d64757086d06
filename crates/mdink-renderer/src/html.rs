//! HTML conversion and height-aware page-break wrapping.

use std::collections::HashMap;
use std::sync::LazyLock;

use mdink_diagrams::PAGE_BREAK;
use pulldown_cmark::{Options, Parser};
use regex::Regex;

/// Sections with an image below this height can share a shortened page.
const SHORT_PAGE_MAX_HEIGHT: i32 = 400;

/// Sections with an image above this height need a taller page.
const TALLER_PAGE_MIN_HEIGHT: i32 = 600;

/// A section whose image reference carries this sentinel never resolved to a
/// rendered file; it passes through unwrapped.
const NO_RESPONSE: &str = "No response";

/// Shortened pages only fit a handful of list items next to the image.
const SHORT_PAGE_MAX_ITEMS: usize = 4;

static EMPTY_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p>\s*<br\s*/?>\s*</p>").unwrap());

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

/// Convert markdown to HTML and strip empty paragraph-wrapped line breaks.
pub(crate) fn markdown_to_html(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(content, options);

    let mut html = String::with_capacity(content.len() * 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    EMPTY_BREAK_RE.replace_all(&html, "").into_owned()
}

/// Wrap the sections between page-break markers in page-style divs.
///
/// Sections containing an image are classified from the image's registered
/// height; sections without one always get a normal page. A section whose
/// image reference cannot be resolved passes through delimited only by the
/// marker. The text after the final marker is dropped, as is the marker
/// trailing the last kept section.
pub(crate) fn wrap_page_sections(html: &str, heights: &HashMap<String, i32>) -> String {
    let parts: Vec<&str> = html.split(PAGE_BREAK).collect();
    if parts.len() == 1 {
        return html.to_owned();
    }

    let mut wrapped = String::with_capacity(html.len() + parts.len() * 32);
    for (index, part) in parts[..parts.len() - 1].iter().enumerate() {
        match page_class(part, index, heights) {
            Some(class) => {
                wrapped.push_str(&format!(r#"<div class="{class}">"#));
                wrapped.push_str(part);
                wrapped.push_str("</div>");
            }
            None => wrapped.push_str(part),
        }
        wrapped.push_str(PAGE_BREAK);
    }
    // Drop the marker trailing the last kept section.
    wrapped.truncate(wrapped.len() - PAGE_BREAK.len());
    wrapped
}

/// Page-style class for one section, or None to pass it through unwrapped.
fn page_class(part: &str, index: usize, heights: &HashMap<String, i32>) -> Option<&'static str> {
    let Some(src) = image_source(part) else {
        return Some("normal-page");
    };
    if src.contains(NO_RESPONSE) {
        return None;
    }
    let height = *heights.get(leaf(src))?;

    if height < SHORT_PAGE_MAX_HEIGHT && index > 0 && list_item_count(part) < SHORT_PAGE_MAX_ITEMS
    {
        Some("short-page")
    } else if height > TALLER_PAGE_MIN_HEIGHT {
        Some("taller-page")
    } else {
        Some("normal-page")
    }
}

/// First image reference in the section, if any.
fn image_source(part: &str) -> Option<&str> {
    IMG_SRC_RE
        .captures(part)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Last path component of an image reference.
fn leaf(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn list_item_count(part: &str) -> usize {
    part.matches("<li>").count()
}
