//! Structural noise categories
//!
//! Each category pairs CSS selectors with an optional name-token [`Rule`]
//! for the class/id spellings selectors cannot express. Categories are
//! applied in table order and removal is unconditional.

use dom_query::{Document, Selection};

use crate::selector::utils::{is_one_of_tags, name_tokens, tag};
use crate::selector::{query_all, Rule};

/// One category of page chrome.
#[derive(Debug, Clone, Copy)]
pub struct NoiseCategory {
    /// Short name used in logs.
    pub name: &'static str,

    /// CSS selectors removed outright.
    pub selectors: &'static [&'static str],

    /// Extra predicate over class/id tokens.
    pub rule: Option<Rule>,
}

/// Noise categories in removal order.
pub static NOISE_CATEGORIES: &[NoiseCategory] = &[
    NoiseCategory {
        name: "navigation",
        selectors: &[
            "nav", "[role='navigation']", ".nav", ".navbar", ".navigation", "#nav",
            "#navigation", ".site-nav",
        ],
        rule: None,
    },
    NoiseCategory {
        name: "sidebar",
        selectors: &["aside", "[role='complementary']", ".sidebar", "#sidebar"],
        rule: None,
    },
    NoiseCategory {
        name: "footer",
        selectors: &["footer", "[role='contentinfo']", ".footer", "#footer", ".site-footer"],
        rule: None,
    },
    NoiseCategory {
        name: "header",
        selectors: &[
            "header", "[role='banner']", ".header", "#header", ".site-header", ".banner",
        ],
        rule: None,
    },
    NoiseCategory {
        name: "advertisement",
        selectors: &[
            ".ad", ".ads", ".advert", ".advertisement", ".sponsored", "[data-ad]",
            ".social", ".social-share", ".share-buttons", ".sharing",
        ],
        rule: Some(is_ad_or_share),
    },
    NoiseCategory {
        name: "breadcrumb",
        selectors: &[
            ".breadcrumb", ".breadcrumbs", "[aria-label='breadcrumb']", ".pagination",
            ".pager",
        ],
        rule: None,
    },
    NoiseCategory {
        name: "menu",
        selectors: &[
            "[role='menu']", "[role='menubar']", ".menu", ".dropdown", ".dropdown-menu",
            ".mega-menu",
        ],
        rule: None,
    },
    NoiseCategory {
        name: "cookie-promo",
        selectors: &[".promo", ".promo-banner", ".popup", ".modal", ".newsletter-signup"],
        rule: Some(is_cookie_or_consent),
    },
    NoiseCategory {
        name: "invisible",
        selectors: &["script", "style", "noscript", "template", "[hidden]"],
        rule: None,
    },
];

/// Residual noise removed from inside a selected content area.
pub static NESTED_NOISE: &[&str] = &[
    "nav", "aside", "footer", ".ad", ".ads", ".advertisement", ".author-bio",
    ".author-info", ".about-author", ".meta", ".post-meta", ".entry-meta",
    ".article-meta", ".byline", ".share", ".social-share", ".related-posts",
];

/// Tags a name-token rule may remove.
const RULE_TAGS: &[&str] = &["div", "section", "aside", "p", "span", "ul", "ol", "li", "form"];

/// Advertising or share widgets spelled as token prefixes (`ad-slot`,
/// `advert-box`, `share-bar`).
fn is_ad_or_share(sel: &Selection) -> bool {
    is_one_of_tags(sel, RULE_TAGS)
        && name_tokens(sel).iter().any(|t| {
            t.starts_with("ad-")
                || t.starts_with("ads-")
                || t.starts_with("advert")
                || t.starts_with("share-")
                || t.starts_with("social-")
        })
}

/// Cookie notices and consent dialogs.
fn is_cookie_or_consent(sel: &Selection) -> bool {
    is_one_of_tags(sel, RULE_TAGS)
        && name_tokens(sel)
            .iter()
            .any(|t| t.contains("cookie") || t.contains("consent") || t.contains("gdpr"))
}

/// Remove every noise category from the document, in table order.
///
/// Returns the number of elements removed. `html` and `body` are never
/// removed, whatever their attributes.
pub fn remove_noise(doc: &Document) -> usize {
    let root = doc.select("html");
    let mut removed = 0;

    for category in NOISE_CATEGORIES {
        removed += remove_category(doc, &root, category);
    }

    removed
}

fn remove_category(doc: &Document, root: &Selection, category: &NoiseCategory) -> usize {
    let mut removed = 0;

    for selector in category.selectors {
        let matched = doc.select(selector);
        for node in matched.nodes() {
            let sel = Selection::from(*node);
            if is_protected(&sel) {
                continue;
            }
            sel.remove();
            removed += 1;
        }
    }

    if let Some(rule) = category.rule {
        for sel in query_all(root, rule) {
            if !is_protected(&sel) {
                sel.remove();
                removed += 1;
            }
        }
    }

    if removed > 0 {
        tracing::trace!(category = category.name, removed, "removed noise");
    }
    removed
}

/// Strip residual noise nested inside a content area.
pub fn remove_nested_noise(doc: &Document) {
    for selector in NESTED_NOISE {
        for node in doc.select(selector).nodes() {
            let sel = Selection::from(*node);
            if !is_protected(&sel) {
                sel.remove();
            }
        }
    }
}

fn is_protected(sel: &Selection) -> bool {
    matches!(tag(sel).as_str(), "html" | "body" | "head")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn body_text(doc: &Document) -> String {
        dom::block_text(&doc.select("body"))
    }

    #[test]
    fn test_removes_every_structural_category() {
        let doc = dom::parse(
            r#"<html><body>
                <header>SITE HEADER</header>
                <nav>NAV LINKS</nav>
                <aside>SIDEBAR</aside>
                <div class="breadcrumb">CRUMBS</div>
                <ul class="menu"><li>MENU ITEM</li></ul>
                <div class="ad">BUY NOW</div>
                <div id="cookie-banner">WE USE COOKIES</div>
                <script>var tracking = true;</script>
                <p>Real content stays.</p>
                <footer>FOOTER</footer>
            </body></html>"#,
        );

        let removed = remove_noise(&doc);
        let text = body_text(&doc);

        assert!(removed >= 9);
        assert!(text.contains("Real content stays."));
        for noise in [
            "SITE HEADER", "NAV LINKS", "SIDEBAR", "CRUMBS", "MENU ITEM", "BUY NOW",
            "WE USE COOKIES", "tracking", "FOOTER",
        ] {
            assert!(!text.contains(noise), "{noise} should be removed");
        }
    }

    #[test]
    fn test_body_with_noisy_class_is_kept() {
        let doc = dom::parse(
            r#"<html><body class="cookie-consent-given"><p>Still here</p></body></html>"#,
        );

        remove_noise(&doc);

        assert!(body_text(&doc).contains("Still here"));
    }

    #[test]
    fn test_token_rules_catch_prefixed_names() {
        let doc = dom::parse(
            r#"<body>
                <div class="ad-slot">AD</div>
                <section class="share-bar">SHARE</section>
                <div class="gdpr-dialog">CONSENT</div>
                <div class="shadow">Kept</div>
            </body>"#,
        );

        remove_noise(&doc);
        let text = body_text(&doc);

        assert!(!text.contains("AD"));
        assert!(!text.contains("SHARE"));
        assert!(!text.contains("CONSENT"));
        assert!(text.contains("Kept"));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = dom::parse("");
        assert_eq!(remove_noise(&doc), 0);
        assert!(body_text(&doc).trim().is_empty());
    }

    #[test]
    fn test_nested_noise_removal() {
        let doc = dom::parse(
            r#"<main><p>Answer text</p><div class="author-bio">About the author</div>
               <div class="post-meta">Posted Monday</div></main>"#,
        );

        remove_nested_noise(&doc);
        let text = dom::block_text(&doc.select("main"));

        assert!(text.contains("Answer text"));
        assert!(!text.contains("About the author"));
        assert!(!text.contains("Posted Monday"));
    }
}
