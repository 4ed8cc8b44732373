//! Utility functions for selector pattern matching
//!
//! Attribute access that never fails (missing attributes read as empty
//! strings) and class-token helpers used by the rule tables.

use crate::dom;
use dom_query::Selection;

/// Get element ID attribute (empty string if missing)
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> String {
    dom::get_attribute(sel, "id").unwrap_or_default()
}

/// Get element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::get_attribute(sel, "class").unwrap_or_default()
}

/// Get any attribute (empty string if missing)
#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

/// Get tag name (empty string if missing)
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Lowercased class tokens followed by the lowercased id.
///
/// `<div id="Cookie" class="a  b">` yields `["a", "b", "cookie"]`.
#[must_use]
pub fn name_tokens(sel: &Selection) -> Vec<String> {
    let mut tokens: Vec<String> = class(sel)
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    let id = id(sel);
    if !id.is_empty() {
        tokens.push(id.to_ascii_lowercase());
    }
    tokens
}

/// Check if element has one of the specified tags
#[must_use]
pub fn is_one_of_tags(sel: &Selection, tags: &[&str]) -> bool {
    let t = tag(sel);
    tags.iter().any(|expected| t == *expected)
}
