//! DOM helpers over `dom_query`.
//!
//! Thin wrappers giving the extraction stages one vocabulary for tag names,
//! sibling walks, detached copies, and block-aware text.

pub use dom_query::{Document, NodeRef, Selection};

/// Tags whose start begins a new line of text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tr", "ul",
];

/// Inline tags that still separate their text from a neighbour's.
const CELL_TAGS: &[&str] = &["td", "th"];

/// Tags whose text never reaches the reader.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> String {
    sel.html().to_string()
}

/// Whether a tag name is `h1`..`h6`.
#[must_use]
pub fn is_heading_tag(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() == 2
        && bytes[0].eq_ignore_ascii_case(&b'h')
        && (b'1'..=b'6').contains(&bytes[1])
}

/// Whether the selection's first node is a heading element.
#[must_use]
pub fn is_heading(sel: &Selection) -> bool {
    tag_name(sel).is_some_and(|t| is_heading_tag(&t))
}

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Copy an element and its descendants into a fresh document.
///
/// Edits to the copy leave the source tree untouched.
#[must_use]
pub fn detached_copy(sel: &Selection) -> Document {
    Document::from(outer_html(sel))
}

/// Visible text of a selection with line breaks at block boundaries.
///
/// `Selection::text` glues adjacent paragraphs together ("a</p><p>b" reads
/// "ab"); this walk breaks the line around every block element and keeps
/// inline text nodes exactly as written, so "<b>un</b>abridged" stays one
/// word. Table cells are separated by a space. Script/style content is
/// skipped.
#[must_use]
pub fn block_text(sel: &Selection) -> String {
    let mut out = String::new();

    for root in sel.nodes() {
        push_visible_text(root, &mut out);
        out.push('\n');
    }

    out
}

fn push_visible_text(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        return;
    }

    let tag = if node.is_element() { node.node_name() } else { None };
    let Some(tag) = tag else {
        for child in node.children() {
            push_visible_text(&child, out);
        }
        return;
    };

    if INVISIBLE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)) {
        return;
    }
    if tag.eq_ignore_ascii_case("br") {
        out.push('\n');
        return;
    }

    let block = BLOCK_TAGS.iter().any(|b| tag.eq_ignore_ascii_case(b));
    if block {
        break_line(out);
    }
    for child in node.children() {
        push_visible_text(&child, out);
    }
    if block {
        break_line(out);
    } else if CELL_TAGS.iter().any(|c| tag.eq_ignore_ascii_case(c)) {
        out.push(' ');
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
