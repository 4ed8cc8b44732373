//! Raw Q&A formatting.
//!
//! Produces a lightweight `## heading` / body document without any language
//! model. Two passes:
//!
//! 1. Every heading of reasonable length is paired with the blocks that
//!    follow it up to the next heading. Question headings and plain topic
//!    headings are formatted the same way.
//! 2. When the first pass yields too little, the cleaned content is split
//!    into sentences and a new topic opens at every question or Q&A-style
//!    opener ("how to", "what is", "you can").
//!
//! The formatter never returns an empty string for non-empty content.

use std::collections::HashSet;

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::QA_OPENER;
use crate::selector::query_all;
use crate::selector::utils::is_one_of_tags;
use crate::text::{char_len, clean_inline, clean_text, truncate_chars};

/// Heading text length range, in characters (inclusive start, exclusive end).
const HEADING_CHARS: std::ops::Range<usize> = 5..200;

/// Stop collecting a heading's body once it reaches this many characters.
const BODY_CAP_CHARS: usize = 1000;

/// Bodies shorter than this are noise.
const MIN_BODY_CHARS: usize = 20;

/// Heading-pass output shorter than this triggers the sentence pass.
const MIN_OUTPUT_CHARS: usize = 100;

/// A sentence topic stops growing at this many body characters.
const SECTION_CAP_CHARS: usize = 500;

/// The sentence pass stops once its output passes this size.
const OUTPUT_CAP_CHARS: usize = 2000;

/// A sentence topic is kept only above this size.
const MIN_SECTION_CHARS: usize = 50;

/// Sibling tags whose text belongs to the preceding heading.
const BODY_TAGS: &[&str] = &["p", "ul", "ol", "li", "div", "span"];

/// One heading and the text under it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QaBlock {
    heading: String,
    body: String,
}

impl QaBlock {
    fn char_len(&self) -> usize {
        char_len(&self.heading) + char_len(&self.body)
    }
}

/// Format a document as heading/body blocks.
///
/// `doc` is the noise-filtered page; `content` is the cleaned main content
/// used by the sentence pass and as the last resort.
#[must_use]
pub fn format_raw_qa(doc: &Document, content: &str) -> String {
    let blocks = heading_blocks(&doc.select("body"));
    let heading_output = render(&blocks);

    if char_len(&heading_output) >= MIN_OUTPUT_CHARS {
        return heading_output;
    }

    // Short heading output is kept and extended with sentence topics it
    // does not already cover.
    let seen: HashSet<&str> = blocks.iter().map(|b| b.heading.as_str()).collect();
    let extra: Vec<QaBlock> = sentence_blocks(content)
        .into_iter()
        .filter(|b| !seen.contains(b.heading.as_str()))
        .collect();

    let combined: Vec<QaBlock> = blocks.iter().cloned().chain(extra).collect();
    let output = render(&combined);

    if output.is_empty() {
        tracing::debug!("no usable headings or topics; returning content unchanged");
        content.to_string()
    } else {
        output
    }
}

fn render(blocks: &[QaBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str("## ");
        out.push_str(&block.heading);
        out.push_str("\n\n");
        out.push_str(&block.body);
        out.push_str("\n\n");
    }
    out.trim_end().to_string()
}

fn is_candidate_heading(sel: &Selection) -> bool {
    dom::is_heading(sel) && HEADING_CHARS.contains(&char_len(&clean_inline(&sel.text())))
}

fn heading_blocks(body: &Selection) -> Vec<QaBlock> {
    let mut blocks = Vec::new();

    for heading in query_all(body, is_candidate_heading) {
        let mut collected = String::new();

        let mut next = dom::next_element_sibling(&heading);
        while let Some(sibling) = next {
            if dom::is_heading(&sibling) || sibling.select("h1, h2, h3, h4, h5, h6").exists() {
                break;
            }
            if is_one_of_tags(&sibling, BODY_TAGS) {
                collected.push_str(&dom::block_text(&sibling));
                collected.push('\n');
                if char_len(collected.trim()) >= BODY_CAP_CHARS {
                    break;
                }
            }
            next = dom::next_element_sibling(&sibling);
        }

        let body = clean_text(&collected);
        let body = truncate_chars(&body, BODY_CAP_CHARS).trim_end().to_string();
        if char_len(&body) < MIN_BODY_CHARS {
            continue;
        }
        blocks.push(QaBlock {
            heading: clean_inline(&heading.text()),
            body,
        });
    }

    blocks
}

fn flush(block: QaBlock, blocks: &mut Vec<QaBlock>, total: &mut usize) {
    if !block.body.is_empty() && block.char_len() > MIN_SECTION_CHARS {
        *total += block.char_len();
        blocks.push(block);
    }
}

fn is_topic_sentence(sentence: &str) -> bool {
    sentence.ends_with('?') || QA_OPENER.is_match(sentence)
}

fn sentence_blocks(content: &str) -> Vec<QaBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<QaBlock> = None;
    let mut total = 0;

    for sentence in split_sentences(content) {
        if total > OUTPUT_CAP_CHARS {
            break;
        }

        if is_topic_sentence(&sentence) {
            if let Some(done) = current.take() {
                flush(done, &mut blocks, &mut total);
            }
            current = Some(QaBlock {
                heading: sentence,
                body: String::new(),
            });
        } else if let Some(open) = current.as_mut() {
            if char_len(&open.body) + char_len(&sentence) < SECTION_CAP_CHARS {
                if !open.body.is_empty() {
                    open.body.push(' ');
                }
                open.body.push_str(&sentence);
            }
        }
    }

    if total <= OUTPUT_CAP_CHARS {
        if let Some(done) = current.take() {
            flush(done, &mut blocks, &mut total);
        }
    }

    blocks
}

/// Split text into sentences at line breaks and at `.`, `!`, `?` followed by
/// whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                while let Some(&p) = chars.peek() {
                    if matches!(p, '.' | '!' | '?') {
                        current.push(p);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek().is_none_or(|c| c.is_whitespace()) {
                    push_sentence(&mut sentences, &current);
                    current.clear();
                }
            }
        }
        push_sentence(&mut sentences, &current);
    }

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
