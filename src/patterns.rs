//! Compiled regex patterns for text cleanup and question detection.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Whitespace Normalization
// =============================================================================

/// Runs of horizontal whitespace (spaces, tabs, non-breaking spaces).
pub static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\u{00A0}\u{2000}-\u{200B}\u{3000}\f\v]+")
        .expect("HORIZONTAL_WHITESPACE regex")
});

/// Three or more newlines (one or more blank lines).
pub static MULTIPLE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex"));

/// Any whitespace run, newlines included.
pub static ANY_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("ANY_WHITESPACE regex"));

// =============================================================================
// Question Detection
// =============================================================================

/// Headings that open with an interrogative word.
pub static INTERROGATIVE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(how|what|why|when|where)\b").expect("INTERROGATIVE_START regex")
});

/// Sentences that open a Q&A-style topic.
pub static QA_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(how to|what is|you can)\b").expect("QA_OPENER regex")
});

// =============================================================================
// Organizer Output
// =============================================================================

/// Markdown code fence around a JSON payload.
pub static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("JSON_FENCE regex")
});

// =============================================================================
// Metadata
// =============================================================================

/// Separators between a page title and the site name.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[|\-–—·:]\s+").expect("TITLE_SEPARATOR regex"));
