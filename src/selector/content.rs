//! Content-area selection
//!
//! The main content is chosen by a fixed cascade:
//!
//! 1. Ordered CSS descriptors, FAQ/support/docs containers before generic
//!    `main`/`article` containers. The first descriptor whose element yields
//!    more than [`MIN_DESCRIPTOR_CHARS`] characters wins.
//! 2. A scan of question-style headings paired with the blocks that follow
//!    them, accepted above [`MIN_HEADING_SCAN_CHARS`] characters.
//! 3. An aggressive pass: strip every noise category again and take the
//!    whole body.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::INTERROGATIVE_START;
use crate::result::ContentSource;
use crate::selector::noise::{remove_nested_noise, remove_noise};
use crate::selector::query_all;
use crate::selector::utils::is_one_of_tags;
use crate::text::{char_len, clean_inline, clean_text};

/// A descriptor's text must be longer than this to be accepted.
pub const MIN_DESCRIPTOR_CHARS: usize = 100;

/// The heading-scan fallback must be longer than this to be accepted.
pub const MIN_HEADING_SCAN_CHARS: usize = 200;

/// Whether a descriptor targets FAQ/support markup or generic layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    DomainSpecific,
    Generic,
}

/// One content-area descriptor.
#[derive(Debug, Clone, Copy)]
pub struct ContentDescriptor {
    pub selector: &'static str,
    pub kind: DescriptorKind,
}

const fn domain(selector: &'static str) -> ContentDescriptor {
    ContentDescriptor { selector, kind: DescriptorKind::DomainSpecific }
}

const fn generic(selector: &'static str) -> ContentDescriptor {
    ContentDescriptor { selector, kind: DescriptorKind::Generic }
}

/// Content descriptors in priority order.
/// First sufficient match wins - check in order.
pub static CONTENT_DESCRIPTORS: &[ContentDescriptor] = &[
    // FAQ / Q&A
    domain("[itemtype*='FAQPage']"),
    domain(".faq-container"),
    domain(".faq-list"),
    domain(".faq-section"),
    domain(".faqs"),
    domain(".faq"),
    domain("#faq"),
    domain(".question-answer"),
    domain(".qa-section"),
    domain(".accordion"),
    // Support / help centre
    domain(".support-content"),
    domain(".help-content"),
    domain(".help-center"),
    domain(".knowledge-base"),
    domain(".kb-article"),
    // Documentation
    domain(".docs-content"),
    domain(".documentation"),
    domain(".markdown-body"),
    // Generic
    generic("main"),
    generic("article"),
    generic("[role='main']"),
    generic("#main-content"),
    generic(".main-content"),
    generic("#content"),
    generic(".content"),
    generic(".post-content"),
    generic(".entry-content"),
    generic(".article-body"),
    generic(".page-content"),
    generic("#main"),
];

/// Block elements whose text joins a heading in the heading scan.
const SCAN_BLOCK_TAGS: &[&str] = &[
    "p", "div", "ul", "ol", "dl", "li", "span", "table", "blockquote", "section", "pre",
];

/// Pick the main content of a noise-filtered document.
///
/// With `extract_main_content` off the whole body text is returned. The
/// document may be mutated by the aggressive pass.
#[must_use]
pub fn select_main_content(doc: &Document, extract_main_content: bool) -> (String, ContentSource) {
    let body = doc.select("body");

    if !extract_main_content {
        return (clean_text(&dom::block_text(&body)), ContentSource::Body);
    }

    for descriptor in CONTENT_DESCRIPTORS {
        let Some(text) = descriptor_text(&body, descriptor) else {
            continue;
        };
        if char_len(&text) > MIN_DESCRIPTOR_CHARS {
            tracing::debug!(selector = descriptor.selector, chars = char_len(&text), "descriptor matched");
            return (text, ContentSource::Descriptor(descriptor.selector.to_string()));
        }
    }

    let scanned = heading_scan(&body);
    if char_len(&scanned) > MIN_HEADING_SCAN_CHARS {
        tracing::debug!(chars = char_len(&scanned), "heading scan accepted");
        return (scanned, ContentSource::HeadingScan);
    }

    remove_noise(doc);
    remove_nested_noise(doc);
    let text = clean_text(&dom::block_text(&doc.select("body")));
    tracing::debug!(chars = char_len(&text), "aggressive body pass");
    (text, ContentSource::Aggressive)
}

/// Text of the first element matching the descriptor, with nested noise
/// stripped from a detached copy.
fn descriptor_text(body: &Selection, descriptor: &ContentDescriptor) -> Option<String> {
    let matched = body.select_single(descriptor.selector);
    if !matched.exists() {
        return None;
    }

    let copy = dom::detached_copy(&matched);
    remove_nested_noise(&copy);
    Some(clean_text(&dom::block_text(&copy.select("body"))))
}

/// Whether a heading reads as a question.
fn is_question_heading(sel: &Selection) -> bool {
    if !dom::is_heading(sel) {
        return false;
    }
    let text = sel.text();
    text.contains('?') || INTERROGATIVE_START.is_match(&text)
}

/// Pair every question heading with the blocks that follow it up to the
/// next heading.
fn heading_scan(body: &Selection) -> String {
    let mut pairs = Vec::new();

    for heading in query_all(body, is_question_heading) {
        let title = clean_inline(&heading.text());
        let mut answer = String::new();

        let mut next = dom::next_element_sibling(&heading);
        while let Some(sibling) = next {
            if dom::is_heading(&sibling) || sibling.select("h1, h2, h3, h4, h5, h6").exists() {
                break;
            }
            if is_one_of_tags(&sibling, SCAN_BLOCK_TAGS) {
                answer.push_str(&dom::block_text(&sibling));
                answer.push('\n');
            }
            next = dom::next_element_sibling(&sibling);
        }

        let answer = clean_text(&answer);
        if answer.is_empty() {
            pairs.push(title);
        } else {
            pairs.push(format!("{title}\n{answer}"));
        }
    }

    pairs.join("\n\n")
}
