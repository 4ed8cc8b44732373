//! Page metadata extraction.
//!
//! Runs on the unfiltered document, before the noise filter removes the
//! `<header>` that often carries the page's `<h1>`.

pub mod meta_tags;

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::patterns::TITLE_SEPARATOR;
use crate::result::ImageRef;
use crate::text::clean_inline;

pub use meta_tags::{examine_meta, MetaTags};

/// Title parts shorter than this are not trusted on their own.
const MIN_TITLE_PART_CHARS: usize = 10;

/// Page-level facts collected before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub link_count: usize,
    pub has_images: bool,
    pub images: Vec<ImageRef>,
}

/// Extract page metadata.
///
/// Title order: meta tags, then `<title>`, then the first `<h1>`.
/// Image references are only collected when `collect_images` is set.
#[must_use]
pub fn extract_page_metadata(doc: &Document, page_url: &str, collect_images: bool) -> PageMetadata {
    let tags = examine_meta(doc);

    let title = tags
        .title
        .or_else(|| examine_title_element(doc))
        .or_else(|| first_heading(doc))
        .map(|t| clean_inline(&t))
        .unwrap_or_default();

    let images = doc.select("img");
    let has_images = images.exists();

    let images = if collect_images {
        let base = Url::parse(page_url).ok();
        images
            .nodes()
            .iter()
            .filter_map(|node| image_ref(&Selection::from(*node), base.as_ref()))
            .collect()
    } else {
        Vec::new()
    };

    PageMetadata {
        title,
        description: tags.description.map(|d| clean_inline(&d)).unwrap_or_default(),
        link_count: doc.select("a[href]").length(),
        has_images,
        images,
    }
}

/// Extract title from <title> element, parsing out site suffixes.
#[must_use]
pub fn examine_title_element(doc: &Document) -> Option<String> {
    let title = doc.select("title").text().trim().to_string();
    if title.is_empty() {
        return None;
    }

    // "Shipping FAQ | Acme" -> "Shipping FAQ" when the leading part stands on its own
    let parts: Vec<&str> = TITLE_SEPARATOR.split(&title).collect();
    if parts.len() > 1 {
        let first = parts[0].trim();
        if first.chars().count() >= MIN_TITLE_PART_CHARS {
            return Some(first.to_string());
        }
    }

    Some(title)
}

fn first_heading(doc: &Document) -> Option<String> {
    let text = doc.select("h1").first().text().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn image_ref(img: &Selection, base: Option<&Url>) -> Option<ImageRef> {
    let src = dom::get_attribute(img, "src")
        .or_else(|| dom::get_attribute(img, "data-src"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let src = match base.and_then(|b| b.join(&src).ok()) {
        Some(resolved) => resolved.to_string(),
        None => src,
    };
    let alt = dom::get_attribute(img, "alt")
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Some(ImageRef { src, alt })
}
