//! Selector infrastructure
//!
//! Ordered rule tables drive both noise removal and content-area selection.
//! A [`Rule`] is a plain predicate over a `Selection`; CSS descriptors are
//! matched through `dom_query`.

use dom_query::Selection;

pub mod content;
pub mod noise;
pub mod utils;

/// A selector rule that tests if a selection matches certain criteria
pub type Rule = fn(&Selection) -> bool;

/// Query for all elements matching the rule
///
/// Iterates through all descendants in document order and collects all
/// elements for which the rule returns true.
///
/// # Example
///
/// ```rust
/// use kb_scrape::selector::{self, utils};
/// use kb_scrape::dom;
///
/// let doc = dom::parse(r#"<div><p class="item">1</p><p class="item">2</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_item_class(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("item")
/// }
///
/// let results = selector::query_all(&root, has_item_class);
/// assert_eq!(results.len(), 2);
/// ```
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    let mut matches = Vec::new();

    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            matches.push(sel);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_query_all_finds_all_matches() {
        let doc = dom::parse(r#"
            <div>
                <p class="target">First</p>
                <span>Not target</span>
                <p class="target">Second</p>
            </div>
        "#);
        let root = doc.select("div");

        fn is_target(sel: &Selection) -> bool {
            utils::class(sel).contains("target")
        }

        let results = query_all(&root, is_target);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_all_returns_empty_when_no_matches() {
        let doc = dom::parse("<div><p>content</p></div>");
        let root = doc.select("div");

        fn never_matches(_sel: &Selection) -> bool {
            false
        }

        assert!(query_all(&root, never_matches).is_empty());
    }

    #[test]
    fn test_query_all_preserves_document_order() {
        let doc = dom::parse(r#"
            <div>
                <h2 class="item">1</h2>
                <section>
                    <h3 class="item">2</h3>
                </section>
                <h2 class="item">3</h2>
            </div>
        "#);
        let root = doc.select("div");

        let results = query_all(&root, dom::is_heading);
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].text().trim(), "1");
        assert_eq!(results[1].text().trim(), "2");
        assert_eq!(results[2].text().trim(), "3");
    }
}
