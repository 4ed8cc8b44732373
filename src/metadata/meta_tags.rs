//! HTML meta tag extraction.
//!
//! Walks every `<meta>` once and keeps the first usable title and
//! description, whichever vocabulary (plain, Open Graph, Twitter, Dublin
//! Core) the page uses.

use dom_query::{Document, Selection};

use crate::dom;

/// Title and description found in meta tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTags {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Collect title and description from meta tags.
///
/// Supports:
/// - Standard meta tags (name/content)
/// - Open Graph (property/content)
/// - Twitter cards (name/content)
/// - Dublin Core tags
#[must_use]
pub fn examine_meta(doc: &Document) -> MetaTags {
    let mut result = MetaTags::default();

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);

        let name = dom::get_attribute(&meta, "name")
            .or_else(|| dom::get_attribute(&meta, "property"))
            .or_else(|| dom::get_attribute(&meta, "itemprop"))
            .unwrap_or_default()
            .to_lowercase();

        let content = dom::get_attribute(&meta, "content").unwrap_or_default();
        let content = content.trim();

        if name.is_empty() || content.is_empty() {
            continue;
        }

        match name.as_str() {
            "og:title" | "twitter:title" | "dc.title" => {
                if result.title.is_none() {
                    result.title = Some(content.to_string());
                }
            }
            "description" | "og:description" | "twitter:description" | "dc.description" => {
                if result.description.is_none() {
                    result.description = Some(content.to_string());
                }
            }
            _ => {}
        }
    }

    result
}
