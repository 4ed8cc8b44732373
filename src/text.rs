//! Text cleanup shared by the extraction stages.
//!
//! Cleaning is line-oriented: horizontal whitespace collapses to single
//! spaces, every line is trimmed, blank-line runs collapse to one blank
//! line, and any character repeated four or more times in a row collapses
//! to two.

use crate::patterns::{ANY_WHITESPACE, HORIZONTAL_WHITESPACE, MULTIPLE_NEWLINES};

/// Appended to content cut at `max_content_length`.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated]";

/// Runs at least this long are collapsed.
const REPEAT_RUN_THRESHOLD: usize = 4;

/// Length a collapsed run is cut down to.
const REPEAT_RUN_KEEP: usize = 2;

/// Normalize extracted text.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let input = input.replace('\r', "");

    let mut lines = Vec::new();
    for line in input.lines() {
        let line = HORIZONTAL_WHITESPACE.replace_all(line, " ");
        lines.push(line.trim().to_string());
    }
    let joined = lines.join("\n");
    let joined = MULTIPLE_NEWLINES.replace_all(&joined, "\n\n");

    collapse_repeated_chars(joined.trim())
}

/// Collapse every whitespace run (newlines included) to one space.
///
/// Used for single-line fields such as headings and titles.
#[must_use]
pub fn clean_inline(input: &str) -> String {
    let flat = ANY_WHITESPACE.replace_all(input.trim(), " ");
    collapse_repeated_chars(&flat)
}

/// Cut runs of four or more identical characters down to two.
#[must_use]
pub fn collapse_repeated_chars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            run += 1;
        }
        let keep = if run >= REPEAT_RUN_THRESHOLD { REPEAT_RUN_KEEP } else { run };
        out.extend(std::iter::repeat(ch).take(keep));
    }

    out
}

/// Cut `text` to at most `limit` characters and append the truncation marker.
///
/// Text already within the limit is returned unchanged.
#[must_use]
pub fn truncate_with_marker(text: &str, limit: usize) -> String {
    let kept = truncate_chars(text, limit);
    if kept.len() == text.len() {
        return text.to_string();
    }
    let mut out = kept.trim_end().to_string();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Longest prefix of `text` holding at most `limit` characters.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        None => text,
        Some((byte_idx, _)) => &text[..byte_idx],
    }
}

/// Number of whitespace-delimited tokens.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Character count (not bytes).
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_spaces_and_trims_lines() {
        let cleaned = clean_text("  Hello \t  world  \n   second   line  ");
        assert_eq!(cleaned, "Hello world\nsecond line");
    }

    #[test]
    fn test_clean_text_collapses_blank_lines() {
        let cleaned = clean_text("one\n\n\n\n   \n\ntwo\r\n\r\nthree");
        assert_eq!(cleaned, "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_collapse_repeated_chars() {
        assert_eq!(collapse_repeated_chars("Wow!!!!!"), "Wow!!");
        assert_eq!(collapse_repeated_chars("-----"), "--");
        assert_eq!(collapse_repeated_chars("aaa"), "aaa");
        assert_eq!(collapse_repeated_chars("book"), "book");
        assert_eq!(collapse_repeated_chars("ééééé"), "éé");
    }

    #[test]
    fn test_clean_inline_flattens_newlines() {
        assert_eq!(clean_inline("  What is\n  shipping?  "), "What is shipping?");
    }

    #[test]
    fn test_truncate_leaves_short_text_alone() {
        assert_eq!(truncate_with_marker("short", 10), "short");
        assert_eq!(truncate_with_marker("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ü".repeat(20);
        let cut = truncate_with_marker(&text, 5);

        assert!(cut.starts_with("üüüüü"));
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert_eq!(char_len(&cut), 5 + char_len(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_bound_holds() {
        let text = "word ".repeat(500);
        for limit in [1, 7, 100, 1000] {
            let cut = truncate_with_marker(&text, limit);
            assert!(char_len(&cut) <= limit + char_len(TRUNCATION_MARKER));
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("Our return policy allows 30 days."), 6);
        assert_eq!(word_count("  \n "), 0);
        assert_eq!(word_count("a\nb\tc"), 3);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("café"), 4);
        assert_eq!("café".len(), 5);
    }
}
