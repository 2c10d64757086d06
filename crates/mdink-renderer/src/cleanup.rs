//! Document-level cleanup of elements that print badly.
//!
//! The source documents are written for interactive viewing: diagrams sit in
//! collapsible `<details>` sections, and endpoint descriptions spread method
//! and path over two lines. Print output wants neither, so the cleanup pass
//! runs after every block substitution. All transforms are idempotent.

use std::sync::LazyLock;

use regex::Regex;

static METHOD_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Method:\s*(\w+)\s*<br>\s*Path:\s*([^\s<]+)\s*<br>").unwrap());

static DUP_PAGE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:<br\s*/?>\s*<div style="page-break-before: always;"></div>\s*){2,}"#)
        .unwrap()
});

static API_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Documentation for the API: )(.*)(<br>)").unwrap());

/// Strip collapsible wrappers, merge method/path lines and collapse
/// duplicated page breaks.
pub(crate) fn clean(content: &str) -> String {
    let content = content
        .replace("<details open>", "")
        .replace("</details>", "")
        .replace("<summary>diagrams</summary>", "");
    let content = METHOD_PATH_RE.replace_all(&content, "$1 $2<br>");
    DUP_PAGE_BREAK_RE
        .replace_all(
            &content,
            "<br/><div style=\"page-break-before: always;\"></div>\n\n",
        )
        .into_owned()
}

/// Wrap `Documentation for the API: <url>` lines in styled anchors.
pub(crate) fn enhance_api_links(content: &str) -> String {
    API_LINK_RE
        .replace_all(content, r#"$1<a href="$2" class="modern-link">$2</a>$3"#)
        .into_owned()
}
